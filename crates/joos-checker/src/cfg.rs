//! Per-method control-flow analysis (spec §4.5): reachability and
//! live-variable data flow, walked directly over the statement tree rather
//! than a materialized graph — Joos's statement set has no `goto`/`break`/
//! `continue`, so the AST's own nesting already *is* the control-flow graph's
//! shape, and a recursive pass over it computes the same `in`/`out` facts
//! spec §4.5 defines node-by-node.
//!
//! Branch-condition constant folding follows the evaluator shape in
//! `original_source/include/staticCheck/evaluator.hpp`: a small post-order
//! walk over literal-and-operator subexpressions, here folding to a
//! `ConstVal` instead of running the program.

use crate::decl::MethodInfo;
use crate::error::{CfgError, DeadAssignment};
use joos_parser::ast::*;
use joos_types::Type;
use rustc_hash::FxHashSet;

pub fn check_method(method: &MethodInfo, body: &Block) -> (Vec<CfgError>, Vec<DeadAssignment>) {
    let mut errors = Vec::new();
    let falls_through = reachability_block(body, true, &mut errors);
    if falls_through && method.return_type != Type::Void && !method.is_constructor {
        errors.push(CfgError::MissingReturn { method: method.name.clone(), span: body.span });
    }
    let mut dead = Vec::new();
    live_block(body, FxHashSet::default(), &mut dead);
    (errors, dead)
}

// ---- Reachability (spec §4.5 "forward BFS") ----------------------------

/// Returns whether control can fall through past `block`.
fn reachability_block(block: &Block, mut reachable: bool, errors: &mut Vec<CfgError>) -> bool {
    for stmt in &block.statements {
        reachable = reachability_stmt(stmt, reachable, errors);
    }
    reachable
}

fn reachability_stmt(stmt: &Stmt, reachable: bool, errors: &mut Vec<CfgError>) -> bool {
    if !reachable {
        errors.push(CfgError::UnreachableStatement { span: stmt.span() });
    }
    match stmt {
        Stmt::Block(b) => reachability_block(b, reachable, errors),
        Stmt::LocalVarDecl(_) | Stmt::Expression(_) | Stmt::Null(..) => reachable,
        Stmt::Return(_) => false,
        Stmt::If(s) => {
            let folded = fold_bool(&s.condition);
            let then_in = reachable && folded != Some(false);
            let else_in = reachable && folded != Some(true);
            let then_out = reachability_stmt(&s.then_branch, then_in, errors);
            let else_out = match &s.else_branch {
                Some(e) => reachability_stmt(e, else_in, errors),
                None => else_in,
            };
            then_out || else_out
        }
        Stmt::While(s) => {
            let folded = fold_bool(&s.condition);
            let body_in = reachable && folded != Some(false);
            reachability_stmt(&s.body, body_in, errors);
            reachable && folded != Some(true)
        }
        Stmt::For(s) => {
            let mut r = reachable;
            if let Some(init) = &s.init {
                r = reachability_stmt(init, r, errors);
            }
            let folded = s.condition.as_ref().and_then(fold_bool);
            let body_in = r && folded != Some(false);
            let body_out = reachability_stmt(&s.body, body_in, errors);
            if let Some(update) = &s.update {
                reachability_stmt(update, body_out, errors);
            }
            r && folded != Some(true)
        }
    }
}

// ---- Live-variable analysis (spec §4.5 "classical backward data-flow") -

fn live_block(block: &Block, live: FxHashSet<String>, dead: &mut Vec<DeadAssignment>) -> FxHashSet<String> {
    let mut live = live;
    for stmt in block.statements.iter().rev() {
        live = live_stmt(stmt, live, dead);
    }
    live
}

/// `live` is the live-out set for `stmt`; returns the live-in set.
fn live_stmt(stmt: &Stmt, live: FxHashSet<String>, dead: &mut Vec<DeadAssignment>) -> FxHashSet<String> {
    match stmt {
        Stmt::Block(b) => live_block(b, live, dead),
        Stmt::LocalVarDecl(d) => {
            let mut live = live;
            if !live.remove(&d.name.name) {
                dead.push(DeadAssignment { variable: d.name.name.clone(), span: d.span });
            }
            collect_uses(&d.initializer, &mut live);
            live
        }
        Stmt::Expression(s) => {
            let mut live = live;
            if let Some(name) = simple_assign_target(&s.expr) {
                if !live.remove(&name) {
                    dead.push(DeadAssignment { variable: name, span: s.span });
                }
            }
            collect_uses(&s.expr, &mut live);
            live
        }
        Stmt::Return(s) => {
            let mut uses = FxHashSet::default();
            if let Some(v) = &s.value {
                collect_uses(v, &mut uses);
            }
            uses
        }
        Stmt::If(s) => {
            let then_live = live_stmt(&s.then_branch, live.clone(), dead);
            let else_live = match &s.else_branch {
                Some(e) => live_stmt(e, live.clone(), dead),
                None => live.clone(),
            };
            let mut merged = then_live;
            merged.extend(else_live);
            collect_uses(&s.condition, &mut merged);
            merged
        }
        Stmt::While(s) => {
            // Single backward pass seeded by the loop-exit live set — a
            // deliberate approximation of the true loop fixed point, since
            // dead-assignment is a warning only (never gates the exit code).
            let body_live = live_stmt(&s.body, live.clone(), dead);
            let mut out = live;
            out.extend(body_live);
            collect_uses(&s.condition, &mut out);
            out
        }
        Stmt::For(s) => {
            let mut out = live;
            if let Some(update) = &s.update {
                out = live_stmt(update, out, dead);
            }
            out = live_stmt(&s.body, out, dead);
            if let Some(cond) = &s.condition {
                collect_uses(cond, &mut out);
            }
            if let Some(init) = &s.init {
                out = live_stmt(init, out, dead);
            }
            out
        }
        Stmt::Null(..) => live,
    }
}

/// `Some(name)` iff `expr` is a plain `name = value` assignment — the only
/// shape spec §4.5 treats as a `def`.
fn simple_assign_target(expr: &Expr) -> Option<String> {
    if let Expr::Assign { target, .. } = expr {
        if let Expr::Name(n) = target.as_ref() {
            if n.segments.len() == 1 {
                return Some(n.segments[0].name.clone());
            }
        }
    }
    None
}

fn collect_uses(expr: &Expr, out: &mut FxHashSet<String>) {
    match expr {
        Expr::Literal { .. } | Expr::This { .. } => {}
        Expr::Name(n) => {
            out.insert(n.segments[0].name.clone());
        }
        Expr::FieldAccess { target, .. } => collect_uses(target, out),
        Expr::MethodCall { target, args, .. } => {
            if let Some(t) = target {
                collect_uses(t, out);
            }
            for a in args {
                collect_uses(a, out);
            }
        }
        Expr::NewObject { args, .. } => {
            for a in args {
                collect_uses(a, out);
            }
        }
        Expr::NewArray { size, .. } => collect_uses(size, out),
        Expr::ArrayAccess { array, index, .. } => {
            collect_uses(array, out);
            collect_uses(index, out);
        }
        Expr::Cast { expr, .. } | Expr::InstanceOf { expr, .. } => collect_uses(expr, out),
        Expr::Unary { operand, .. } => collect_uses(operand, out),
        Expr::Binary { left, right, .. } => {
            collect_uses(left, out);
            collect_uses(right, out);
        }
        Expr::Assign { target, value, .. } => {
            // A plain-name target is a pure def, not a use of itself; a
            // compound target (`a[i]`, `o.f`) still reads its base.
            if !matches!(target.as_ref(), Expr::Name(_)) {
                collect_uses(target, out);
            }
            collect_uses(value, out);
        }
    }
}

// ---- Constant folding (spec §4.5, grounded on the teacher's RPN evaluator)

enum ConstVal {
    Int(i64),
    Bool(bool),
}

fn fold_const(expr: &Expr) -> Option<ConstVal> {
    match expr {
        Expr::Literal { value, .. } => match value {
            Literal::Int(n) => Some(ConstVal::Int(*n)),
            Literal::Bool(b) => Some(ConstVal::Bool(*b)),
            _ => None,
        },
        Expr::Unary { op, operand, .. } => match (op, fold_const(operand)?) {
            (UnaryOp::Neg, ConstVal::Int(n)) => Some(ConstVal::Int(n.wrapping_neg())),
            (UnaryOp::Not, ConstVal::Bool(b)) => Some(ConstVal::Bool(!b)),
            _ => None,
        },
        Expr::Binary { op, left, right, .. } => {
            let l = fold_const(left)?;
            let r = fold_const(right)?;
            fold_binary(*op, l, r)
        }
        _ => None,
    }
}

fn fold_binary(op: BinaryOp, l: ConstVal, r: ConstVal) -> Option<ConstVal> {
    use BinaryOp::*;
    use ConstVal::*;
    match (op, l, r) {
        (Add, Int(a), Int(b)) => Some(Int(a.wrapping_add(b))),
        (Sub, Int(a), Int(b)) => Some(Int(a.wrapping_sub(b))),
        (Mul, Int(a), Int(b)) => Some(Int(a.wrapping_mul(b))),
        (Div, Int(a), Int(b)) if b != 0 => Some(Int(a / b)),
        (Rem, Int(a), Int(b)) if b != 0 => Some(Int(a % b)),
        (Lt, Int(a), Int(b)) => Some(Bool(a < b)),
        (Le, Int(a), Int(b)) => Some(Bool(a <= b)),
        (Gt, Int(a), Int(b)) => Some(Bool(a > b)),
        (Ge, Int(a), Int(b)) => Some(Bool(a >= b)),
        (Eq, Int(a), Int(b)) => Some(Bool(a == b)),
        (Ne, Int(a), Int(b)) => Some(Bool(a != b)),
        (Eq, Bool(a), Bool(b)) => Some(Bool(a == b)),
        (Ne, Bool(a), Bool(b)) => Some(Bool(a != b)),
        (LazyAnd, Bool(a), Bool(b)) | (EagerAnd, Bool(a), Bool(b)) => Some(Bool(a && b)),
        (LazyOr, Bool(a), Bool(b)) | (EagerOr, Bool(a), Bool(b)) => Some(Bool(a || b)),
        _ => None,
    }
}

fn fold_bool(expr: &Expr) -> Option<bool> {
    match fold_const(expr)? {
        ConstVal::Bool(b) => Some(b),
        ConstVal::Int(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{MethodInfo, ParamInfo};
    use joos_parser::{parse_file, FileId};
    use joos_types::DeclId;

    fn method_body(src: &str) -> Block {
        let unit = parse_file(FileId(0), src).expect("parse");
        let TypeDecl::Class(c) = unit.type_decl else { panic!("expected class") };
        c.methods.into_iter().next().expect("one method").body.expect("has body")
    }

    fn fake_method(return_type: Type) -> MethodInfo {
        MethodInfo {
            node: NodeId(0),
            owner: DeclId(0),
            name: "m".to_string(),
            modifiers: Default::default(),
            is_constructor: false,
            params: Vec::<ParamInfo>::new(),
            return_type,
            has_body: true,
            color: None,
            span: joos_parser::Span::synthetic(joos_parser::FileId(u32::MAX)),
        }
    }

    #[test]
    fn statement_after_return_is_unreachable() {
        let body = method_body("class A { public A() {} public int m() { return 1; return 2; } }");
        let (errors, _) = check_method(&fake_method(Type::Primitive(joos_types::Primitive::Int)), &body);
        assert!(errors.iter().any(|e| matches!(e, CfgError::UnreachableStatement { .. })));
    }

    #[test]
    fn missing_return_on_fall_through_path() {
        let body = method_body("class A { public A() {} public int m() { if (true) { return 1; } } }");
        let (errors, _) = check_method(&fake_method(Type::Primitive(joos_types::Primitive::Int)), &body);
        assert!(errors.iter().any(|e| matches!(e, CfgError::MissingReturn { .. })));
    }

    #[test]
    fn always_true_constant_condition_makes_else_branch_unreachable() {
        let body = method_body(
            "class A { public A() {} public int m() { if (true) { return 1; } else { return 2; } } }",
        );
        let (errors, _) = check_method(&fake_method(Type::Primitive(joos_types::Primitive::Int)), &body);
        assert!(!errors.iter().any(|e| matches!(e, CfgError::MissingReturn { .. })));
    }

    #[test]
    fn reassignment_before_any_use_is_dead() {
        let body = method_body(
            "class A { public A() {} public void m() { int x = 1; x = 2; int y = x; } }",
        );
        let (_, dead) = check_method(&fake_method(Type::Void), &body);
        // `x = 1;` is immediately overwritten before any read: its value is dead.
        assert!(dead.iter().any(|d| d.variable == "x"));
    }
}
