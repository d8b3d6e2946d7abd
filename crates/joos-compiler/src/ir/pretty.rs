//! Pretty-printing for the tree IR — debugging aid only, not read by any
//! later pass. Grounded on the teacher's `PrettyPrint` trait shape
//! (`pretty_print(&self) -> String`), retargeted from basic-block/SSA
//! formatting onto an s-expression rendering of the tree (the natural
//! textual form for a tree IR, used the same way Tiger-book compilers print
//! their IR for debugging).

use super::instr::{BinOp, Expr, RelOp, Stmt};
use std::fmt::Write;

pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Expr {
    fn pretty_print(&self) -> String {
        match self {
            Expr::Const(n) => n.to_string(),
            Expr::Temp(t) => t.to_string(),
            Expr::Mem(addr) => format!("(MEM {})", addr.pretty_print()),
            Expr::Binop(op, l, r) => format!("({} {} {})", op_str(*op), l.pretty_print(), r.pretty_print()),
            Expr::Call(target, args) => {
                let args = args.iter().map(Expr::pretty_print).collect::<Vec<_>>().join(" ");
                format!("(CALL {} {})", target.pretty_print(), args)
            }
            Expr::Name(label) => format!("(NAME {label})"),
            Expr::Eseq(s, e) => format!("(ESEQ {} {})", s.pretty_print(), e.pretty_print()),
        }
    }
}

impl PrettyPrint for Stmt {
    fn pretty_print(&self) -> String {
        match self {
            Stmt::Move(dst, src) => format!("(MOVE {} {})", dst.pretty_print(), src.pretty_print()),
            Stmt::Exp(e) => format!("(EXP {})", e.pretty_print()),
            Stmt::Jump(l) => format!("(JUMP {l})"),
            Stmt::CJump(op, l, r, t, f) => {
                format!("(CJUMP {} {} {} {t} {f})", relop_str(*op), l.pretty_print(), r.pretty_print())
            }
            Stmt::Seq(stmts) => {
                let mut out = String::new();
                writeln!(out, "(SEQ").unwrap();
                for s in stmts {
                    writeln!(out, "  {}", s.pretty_print()).unwrap();
                }
                write!(out, ")").unwrap();
                out
            }
            Stmt::Label(l) => format!("(LABEL {l})"),
            Stmt::Return(Some(e)) => format!("(RETURN {})", e.pretty_print()),
            Stmt::Return(None) => "(RETURN)".to_string(),
        }
    }
}

fn op_str(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Rem => "%",
        BinOp::And => "&",
        BinOp::Or => "|",
    }
}

fn relop_str(op: RelOp) -> &'static str {
    match op {
        RelOp::Eq => "==",
        RelOp::Ne => "!=",
        RelOp::Lt => "<",
        RelOp::Le => "<=",
        RelOp::Gt => ">",
        RelOp::Ge => ">=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::value::Temp;

    #[test]
    fn renders_a_simple_move() {
        let stmt = Stmt::Move(Expr::Temp(Temp(0)), Expr::Const(42));
        assert_eq!(stmt.pretty_print(), "(MOVE t0 42)");
    }
}
