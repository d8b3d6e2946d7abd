//! TIR canonicalization (spec §4.7).
//!
//! A full Appel-style canonicalizer reorders statements around `Call`
//! expressions hoisted out of argument lists, checking commutativity at
//! every step. `joos-compiler`'s lowering never produces that shape in the
//! first place: every `Call` is constructed already wrapped as the RHS of a
//! `Move` inside an `Eseq` (see `lower::expr`'s "smart constructors" —
//! `lower_method_call`, `lower_new_object`, `lower_array_access`'s bounds
//! check, and so on all build their own `Eseq(Seq(...), value)` at
//! construction time). So the only work left for this pass is flattening
//! every `Eseq` out of expression position into the enclosing statement
//! list — no separate call-hoisting or commutativity analysis is needed.

use crate::ir::{Expr, Stmt};

pub fn canonicalize(body: Stmt) -> Vec<Stmt> {
    canon_stmt(body)
}

fn canon_stmt(s: Stmt) -> Vec<Stmt> {
    match s {
        Stmt::Seq(stmts) => stmts.into_iter().flat_map(canon_stmt).collect(),
        Stmt::Move(dst, src) => {
            let (mut pre, dst2) = canon_expr(dst);
            let (pre2, src2) = canon_expr(src);
            pre.extend(pre2);
            pre.push(Stmt::Move(dst2, src2));
            pre
        }
        Stmt::Exp(e) => {
            let (mut pre, e2) = canon_expr(e);
            pre.push(Stmt::Exp(e2));
            pre
        }
        Stmt::CJump(op, l, r, t, f) => {
            let (mut pre, l2) = canon_expr(l);
            let (pre2, r2) = canon_expr(r);
            pre.extend(pre2);
            pre.push(Stmt::CJump(op, l2, r2, t, f));
            pre
        }
        Stmt::Return(Some(e)) => {
            let (mut pre, e2) = canon_expr(e);
            pre.push(Stmt::Return(Some(e2)));
            pre
        }
        Stmt::Return(None) | Stmt::Jump(_) | Stmt::Label(_) => vec![s],
    }
}

fn canon_expr(e: Expr) -> (Vec<Stmt>, Expr) {
    match e {
        Expr::Const(_) | Expr::Temp(_) | Expr::Name(_) => (Vec::new(), e),
        Expr::Mem(addr) => {
            let (pre, addr2) = canon_expr(*addr);
            (pre, Expr::Mem(Box::new(addr2)))
        }
        Expr::Binop(op, l, r) => {
            let (mut pre, l2) = canon_expr(*l);
            let (pre2, r2) = canon_expr(*r);
            pre.extend(pre2);
            (pre, Expr::Binop(op, Box::new(l2), Box::new(r2)))
        }
        Expr::Call(target, args) => {
            let (mut pre, target2) = canon_expr(*target);
            let mut args2 = Vec::with_capacity(args.len());
            for a in args {
                let (p, a2) = canon_expr(a);
                pre.extend(p);
                args2.push(a2);
            }
            (pre, Expr::Call(Box::new(target2), args2))
        }
        Expr::Eseq(stmt, expr) => {
            let mut pre = canon_stmt(*stmt);
            let (pre2, e2) = canon_expr(*expr);
            pre.extend(pre2);
            (pre, e2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Label, Temp};

    #[test]
    fn flattens_eseq_out_of_a_move_rhs() {
        let t = Temp(0);
        let inner = Stmt::Exp(Expr::Call(Box::new(Expr::Name(Label("f".into()))), vec![]));
        let body = Stmt::Move(Expr::Temp(t), Expr::Eseq(Box::new(inner), Box::new(Expr::Const(1))));
        let out = canonicalize(body);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], Stmt::Exp(Expr::Call(..))));
        assert!(matches!(out[1], Stmt::Move(Expr::Temp(_), Expr::Const(1))));
    }

    #[test]
    fn seq_flattens_into_a_single_list() {
        let body = Stmt::Seq(vec![Stmt::Seq(vec![Stmt::Exp(Expr::Const(0))]), Stmt::Exp(Expr::Const(1))]);
        assert_eq!(canonicalize(body).len(), 2);
    }
}
