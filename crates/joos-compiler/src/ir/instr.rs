//! Tree IR: the expression/statement language spec §4.6 lowers Joos AST
//! into and §4.7 canonicalizes. Replaces the teacher's basic-block/SSA
//! `IrInstr` three-address code — Joos's target is maximal-munch tiling over
//! a tree (spec §4.8), which wants nested expressions, not a flat SSA list.
//! The shape (`Const`/`Temp`/`Mem`/`Binop`/`Call`/`Name`/`Eseq` expressions,
//! `Move`/`Exp`/`Jump`/`CJump`/`Seq`/`Label`/`Return` statements) is the
//! standard tree-IR split the spec's canonicalization rules (ESEQ
//! elimination, call-hoisting) presuppose.

use super::value::{Label, Temp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    pub fn negate(self) -> RelOp {
        match self {
            RelOp::Eq => RelOp::Ne,
            RelOp::Ne => RelOp::Eq,
            RelOp::Lt => RelOp::Ge,
            RelOp::Le => RelOp::Gt,
            RelOp::Gt => RelOp::Le,
            RelOp::Ge => RelOp::Lt,
        }
    }
}

/// A tree-IR expression. `Call` and `Eseq` may appear nested before
/// canonicalization (spec §4.6); canonicalization (spec §4.7) removes both
/// from anywhere but statement position.
#[derive(Debug, Clone)]
pub enum Expr {
    Const(i32),
    /// The value of a temporary (an abstract argument `_ARGk`, `_RET`, or a
    /// fresh lowering temp).
    Temp(Temp),
    /// One word at address `addr`.
    Mem(Box<Expr>),
    Binop(BinOp, Box<Expr>, Box<Expr>),
    /// `target(args)`: `target` is usually `Name` (a direct/static/virtual
    /// call target already resolved to a label or a dispatch-vector slot
    /// load) but may be any address-valued expression.
    Call(Box<Expr>, Vec<Expr>),
    /// The address denoted by a label — a function, a static field slot, or
    /// a class's dispatch vector.
    Name(Label),
    /// Evaluate `stmt` for its side effects, then yield `expr`.
    Eseq(Box<Stmt>, Box<Expr>),
}

/// A tree-IR statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `dst := src`. `dst` is `Temp` or `Mem` — nothing else is a valid
    /// assignment target post name-resolution.
    Move(Expr, Expr),
    /// An expression evaluated for its side effects, result discarded
    /// (almost always a `Call`).
    Exp(Expr),
    Jump(Label),
    /// Branch to `t` if `left op right`, else fall through to `f`.
    CJump(RelOp, Expr, Expr, Label, Label),
    Seq(Vec<Stmt>),
    Label(Label),
    /// Writes `_RET` and transfers control to the method epilogue. `None`
    /// for a `void` method.
    Return(Option<Expr>),
}

impl Stmt {
    pub fn seq(stmts: Vec<Stmt>) -> Stmt {
        Stmt::Seq(stmts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relop_negation_is_involutive() {
        for op in [RelOp::Eq, RelOp::Ne, RelOp::Lt, RelOp::Le, RelOp::Gt, RelOp::Ge] {
            assert_eq!(op.negate().negate(), op);
        }
    }
}
