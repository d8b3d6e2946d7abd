//! A shallow visitor over statements and expressions.
//!
//! Mirrors the teacher's `raya_parser::ast::visitor` shape: default methods
//! that recurse into children, overridden selectively by passes that only
//! care about a handful of node kinds (the CFG builder only needs
//! statements; the name resolver only needs expressions).

use super::*;

pub trait Visitor {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_stmt<V: Visitor + ?Sized>(v: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Block(b) => {
            for s in &b.statements {
                v.visit_stmt(s);
            }
        }
        Stmt::LocalVarDecl(d) => v.visit_expr(&d.initializer),
        Stmt::If(s) => {
            v.visit_expr(&s.condition);
            v.visit_stmt(&s.then_branch);
            if let Some(e) = &s.else_branch {
                v.visit_stmt(e);
            }
        }
        Stmt::While(s) => {
            v.visit_expr(&s.condition);
            v.visit_stmt(&s.body);
        }
        Stmt::For(s) => {
            if let Some(init) = &s.init {
                v.visit_stmt(init);
            }
            if let Some(cond) = &s.condition {
                v.visit_expr(cond);
            }
            if let Some(update) = &s.update {
                v.visit_stmt(update);
            }
            v.visit_stmt(&s.body);
        }
        Stmt::Return(s) => {
            if let Some(e) = &s.value {
                v.visit_expr(e);
            }
        }
        Stmt::Expression(s) => v.visit_expr(&s.expr),
        Stmt::Null(..) => {}
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, expr: &Expr) {
    match expr {
        Expr::Literal { .. } | Expr::This { .. } | Expr::Name(_) => {}
        Expr::FieldAccess { target, .. } => v.visit_expr(target),
        Expr::MethodCall { target, args, .. } => {
            if let Some(t) = target {
                v.visit_expr(t);
            }
            for a in args {
                v.visit_expr(a);
            }
        }
        Expr::NewObject { args, .. } => {
            for a in args {
                v.visit_expr(a);
            }
        }
        Expr::NewArray { size, .. } => v.visit_expr(size),
        Expr::ArrayAccess { array, index, .. } => {
            v.visit_expr(array);
            v.visit_expr(index);
        }
        Expr::Cast { expr, .. } | Expr::InstanceOf { expr, .. } | Expr::Unary { operand: expr, .. } => {
            v.visit_expr(expr);
        }
        Expr::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
    }
}
