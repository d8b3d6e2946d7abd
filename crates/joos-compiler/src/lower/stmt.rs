//! Statement lowering (spec §4.6): walks a method body's `Block`, emitting
//! `crate::ir::Stmt`s directly rather than building a basic-block graph —
//! canonicalization (`crate::canon`) is what later linearizes this into
//! tile-selectable form, so there is no need for an intermediate CFG here.

use super::expr::{lower_expr, Ctx};
use crate::error::CompileResult;
use crate::ir::{Expr as IrExpr, RelOp, Stmt as IrStmt};
use joos_parser::ast::*;

pub(crate) fn lower_block(ctx: &mut Ctx, block: &Block, out: &mut Vec<IrStmt>) -> CompileResult<()> {
    let saved_scope = ctx.scope.clone();
    for s in &block.statements {
        lower_stmt(ctx, s, out)?;
    }
    ctx.scope = saved_scope;
    Ok(())
}

fn lower_stmt(ctx: &mut Ctx, s: &Stmt, out: &mut Vec<IrStmt>) -> CompileResult<()> {
    match s {
        Stmt::Block(b) => lower_block(ctx, b, out),
        Stmt::LocalVarDecl(decl) => lower_local_var_decl(ctx, decl, out),
        Stmt::If(if_stmt) => lower_if(ctx, if_stmt, out),
        Stmt::While(while_stmt) => lower_while(ctx, while_stmt, out),
        Stmt::For(for_stmt) => lower_for(ctx, for_stmt, out),
        Stmt::Return(ret) => lower_return(ctx, ret, out),
        Stmt::Expression(expr_stmt) => {
            let e = lower_expr(ctx, &expr_stmt.expr)?;
            out.push(IrStmt::Exp(e));
            Ok(())
        }
        Stmt::Null(..) => Ok(()),
    }
}

fn lower_local_var_decl(ctx: &mut Ctx, decl: &LocalVarDecl, out: &mut Vec<IrStmt>) -> CompileResult<()> {
    let value = lower_expr(ctx, &decl.initializer)?;
    let t = ctx.temps.fresh();
    out.push(IrStmt::Move(IrExpr::Temp(t), value));
    let ty = ctx.tables.resolutions.local_types.get(&decl.id).cloned().unwrap_or(joos_types::Type::Void);
    ctx.scope.insert(decl.name.name.clone(), (t, ty));
    Ok(())
}

fn lower_if(ctx: &mut Ctx, if_stmt: &IfStmt, out: &mut Vec<IrStmt>) -> CompileResult<()> {
    let cond = lower_expr(ctx, &if_stmt.condition)?;
    let then_label = ctx.labelgen.fresh("if_then");
    let else_label = ctx.labelgen.fresh("if_else");
    let end_label = ctx.labelgen.fresh("if_end");

    out.push(IrStmt::CJump(RelOp::Ne, cond, IrExpr::Const(0), then_label.clone(), else_label.clone()));
    out.push(IrStmt::Label(then_label));
    lower_stmt(ctx, &if_stmt.then_branch, out)?;
    out.push(IrStmt::Jump(end_label.clone()));
    out.push(IrStmt::Label(else_label));
    if let Some(else_branch) = &if_stmt.else_branch {
        lower_stmt(ctx, else_branch, out)?;
    }
    out.push(IrStmt::Label(end_label));
    Ok(())
}

fn lower_while(ctx: &mut Ctx, while_stmt: &WhileStmt, out: &mut Vec<IrStmt>) -> CompileResult<()> {
    let top = ctx.labelgen.fresh("while_top");
    let body = ctx.labelgen.fresh("while_body");
    let end = ctx.labelgen.fresh("while_end");

    out.push(IrStmt::Label(top.clone()));
    let cond = lower_expr(ctx, &while_stmt.condition)?;
    out.push(IrStmt::CJump(RelOp::Ne, cond, IrExpr::Const(0), body.clone(), end.clone()));
    out.push(IrStmt::Label(body));
    lower_stmt(ctx, &while_stmt.body, out)?;
    out.push(IrStmt::Jump(top));
    out.push(IrStmt::Label(end));
    Ok(())
}

fn lower_for(ctx: &mut Ctx, for_stmt: &ForStmt, out: &mut Vec<IrStmt>) -> CompileResult<()> {
    let saved_scope = ctx.scope.clone();
    if let Some(init) = &for_stmt.init {
        lower_stmt(ctx, init, out)?;
    }

    let top = ctx.labelgen.fresh("for_top");
    let body = ctx.labelgen.fresh("for_body");
    let end = ctx.labelgen.fresh("for_end");

    out.push(IrStmt::Label(top.clone()));
    match &for_stmt.condition {
        Some(cond) => {
            let c = lower_expr(ctx, cond)?;
            out.push(IrStmt::CJump(RelOp::Ne, c, IrExpr::Const(0), body.clone(), end.clone()));
        }
        None => out.push(IrStmt::Jump(body.clone())),
    }
    out.push(IrStmt::Label(body));
    lower_stmt(ctx, &for_stmt.body, out)?;
    if let Some(update) = &for_stmt.update {
        lower_stmt(ctx, update, out)?;
    }
    out.push(IrStmt::Jump(top));
    out.push(IrStmt::Label(end));

    ctx.scope = saved_scope;
    Ok(())
}

fn lower_return(ctx: &mut Ctx, ret: &ReturnStmt, out: &mut Vec<IrStmt>) -> CompileResult<()> {
    let value = match &ret.value {
        Some(e) => Some(lower_expr(ctx, e)?),
        None => None,
    };
    out.push(IrStmt::Return(value));
    Ok(())
}
