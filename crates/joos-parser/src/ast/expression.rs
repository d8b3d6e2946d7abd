//! Expression AST nodes.
//!
//! Spec §4.4 describes expression resolution as a left-to-right walk over "a
//! sequence of nodes in reverse-polish order"; this tree shape is
//! semantically equivalent (operators still see their operands resolved
//! before themselves — the resolver walks the tree post-order) and lets Rust
//! own the structure the ordinary way, matching how the teacher's
//! `raya_parser::ast::expression` represents expressions as a tree rather
//! than a flattened stack.

use super::{Ident, NodeId, TypeRef};
use crate::span::Span;

/// Binary operators, spec §4.4's "13 arithmetic/relational/logical opcodes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    LazyAnd,
    LazyOr,
    EagerAnd,
    EagerOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Char(char),
    Str(String),
    Bool(bool),
    Null,
}

/// A dotted name as written (`a`, `a.b.c`), not yet classified into an
/// expression/type/package name by the disambiguator (spec §4.4). A `Name`
/// node surviving to codegen is an internal-compiler-error: every reachable
/// `Name` must have an entry in the resolver's classification table by the
/// end of name resolution, which stands in for spec §3's invariant "the AST
/// contains no SimpleName/QualifiedName nodes" in this side-table design
/// (see `ast::mod` doc comment).
#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub id: NodeId,
    pub segments: Vec<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal { id: NodeId, value: Literal, span: Span },
    This { id: NodeId, span: Span },
    Name(Name),
    FieldAccess {
        id: NodeId,
        target: Box<Expr>,
        name: Ident,
        span: Span,
    },
    /// `target.method(args)` when `target` is `Some`, else an unqualified
    /// call `method(args)` resolved against the enclosing class.
    MethodCall {
        id: NodeId,
        target: Option<Box<Expr>>,
        method: Ident,
        args: Vec<Expr>,
        span: Span,
    },
    NewObject {
        id: NodeId,
        class: TypeRef,
        args: Vec<Expr>,
        span: Span,
    },
    NewArray {
        id: NodeId,
        element_type: TypeRef,
        size: Box<Expr>,
        span: Span,
    },
    ArrayAccess {
        id: NodeId,
        array: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Cast {
        id: NodeId,
        target_type: TypeRef,
        expr: Box<Expr>,
        span: Span,
    },
    InstanceOf {
        id: NodeId,
        expr: Box<Expr>,
        target_type: TypeRef,
        span: Span,
    },
    Unary {
        id: NodeId,
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    Binary {
        id: NodeId,
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    /// `target = value`; `target` must, after resolution, denote an
    /// expression name, field access, or array access (never a type/package
    /// name, never a method call) — enforced by the expression resolver.
    Assign {
        id: NodeId,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Literal { id, .. }
            | Expr::This { id, .. }
            | Expr::FieldAccess { id, .. }
            | Expr::MethodCall { id, .. }
            | Expr::NewObject { id, .. }
            | Expr::NewArray { id, .. }
            | Expr::ArrayAccess { id, .. }
            | Expr::Cast { id, .. }
            | Expr::InstanceOf { id, .. }
            | Expr::Unary { id, .. }
            | Expr::Binary { id, .. }
            | Expr::Assign { id, .. } => *id,
            Expr::Name(n) => n.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::Literal { span, .. }
            | Expr::This { span, .. }
            | Expr::FieldAccess { span, .. }
            | Expr::MethodCall { span, .. }
            | Expr::NewObject { span, .. }
            | Expr::NewArray { span, .. }
            | Expr::ArrayAccess { span, .. }
            | Expr::Cast { span, .. }
            | Expr::InstanceOf { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Assign { span, .. } => *span,
            Expr::Name(n) => n.span,
        }
    }
}
