//! Expression lowering (spec §4.6), one function per `ast::Expr` variant.

use super::{lookup_field, lookup_methods, select_overload, Tables};
use crate::error::{CompileError, CompileResult};
use crate::ir::{BinOp, Expr as IrExpr, Label, LabelGen, RelOp, Stmt as IrStmt, Temp, TempGen};
use crate::layout::{ARRAY_ELEMENTS_OFFSET, ARRAY_LENGTH_OFFSET};
use joos_checker::decl::Decl;
use joos_checker::resolve::NameKind;
use joos_parser::ast::*;
use joos_parser::Span;
use joos_types::{DeclId, Hierarchy, Primitive, Type};
use rustc_hash::FxHashMap;

/// Per-method lowering state: shared program tables plus this method's own
/// fresh-temp/fresh-label generators and local scope.
pub(crate) struct Ctx<'a> {
    pub tables: &'a Tables<'a>,
    pub class: DeclId,
    pub is_static: bool,
    pub this_temp: Option<Temp>,
    pub scope: FxHashMap<String, (Temp, Type)>,
    pub temps: &'a mut TempGen,
    pub labelgen: &'a mut LabelGen,
}

fn word(offset: i32) -> IrExpr {
    IrExpr::Const(offset)
}

fn field_addr(base: IrExpr, byte_offset: i32) -> IrExpr {
    if byte_offset == 0 {
        base
    } else {
        IrExpr::Binop(BinOp::Add, Box::new(base), Box::new(word(byte_offset)))
    }
}

pub(crate) fn lower_expr(ctx: &mut Ctx, e: &Expr) -> CompileResult<IrExpr> {
    match e {
        Expr::Literal { value, .. } => lower_literal(ctx, value),
        Expr::This { .. } => Ok(IrExpr::Temp(ctx.this_temp.expect("checker rejects `this` in a static context"))),
        Expr::Name(name) => lower_name(ctx, name),
        Expr::FieldAccess { target, name, span, .. } => lower_field_access(ctx, target, name, *span),
        Expr::MethodCall { target, method, args, span, .. } => lower_method_call(ctx, target.as_deref(), method, args, *span),
        Expr::NewObject { id, class, args, span, .. } => lower_new_object(ctx, *id, class, args, *span),
        Expr::NewArray { id, size, .. } => lower_new_array(ctx, *id, size),
        Expr::ArrayAccess { array, index, span, .. } => lower_array_access(ctx, array, index, *span),
        Expr::Cast { expr, .. } => lower_expr(ctx, expr),
        Expr::InstanceOf { id, expr, span, .. } => lower_instance_of(ctx, *id, expr, *span),
        Expr::Unary { op, operand, .. } => lower_unary(ctx, *op, operand),
        Expr::Binary { id, op, left, right, span } => lower_binary(ctx, *id, *op, left, right, *span),
        Expr::Assign { target, value, .. } => lower_assign(ctx, target, value),
    }
}

fn lower_literal(ctx: &mut Ctx, lit: &Literal) -> CompileResult<IrExpr> {
    Ok(match lit {
        Literal::Int(n) => IrExpr::Const(*n as i32),
        Literal::Char(c) => IrExpr::Const(*c as i32),
        Literal::Bool(b) => IrExpr::Const(*b as i32),
        Literal::Null => IrExpr::Const(0),
        Literal::Str(s) => {
            let data_label = ctx.tables.intern_string(s);
            IrExpr::Call(Box::new(IrExpr::Name(Label("NATIVEjava.lang.String.fromLiteral".to_string()))), vec![IrExpr::Name(data_label)])
        }
    })
}

/// Resolves a `Name` chain using `Resolutions.name_kinds`/`local_types`
/// (spec §4.4's classification, replayed here instead of re-derived) and
/// walks any trailing field segments the same way
/// `joos_checker::resolve::resolve_field_chain` classifies them, but
/// producing an address/value instead of a type.
fn lower_name(ctx: &mut Ctx, name: &Name) -> CompileResult<IrExpr> {
    let kind = *ctx.tables.resolutions.name_kinds.get(&name.id).ok_or(CompileError::UnresolvedName(name.span))?;
    let head = &name.segments[0];
    let rest = &name.segments[1..];

    match kind {
        NameKind::Local => {
            let (t, ty) = ctx.scope.get(&head.name).cloned().ok_or(CompileError::UnresolvedName(name.span))?;
            lower_field_chain(ctx, IrExpr::Temp(t), ty, rest, name.span)
        }
        NameKind::Field { owner, is_static } => {
            let (declaring, field) = lookup_field(ctx.tables.decls, owner, &head.name).ok_or(CompileError::NoMatchingField(name.span))?;
            let value = if is_static {
                IrExpr::Mem(Box::new(IrExpr::Name(ctx.tables.field_labels.get(&field.node).cloned().ok_or(CompileError::MissingLabel)?)))
            } else {
                let this = ctx.this_temp.expect("checker rejects instance-field reads in a static context");
                let layout = &ctx.tables.layouts[&declaring];
                let offset = layout.field_offset(&head.name).ok_or(CompileError::NoMatchingField(name.span))? as i32;
                IrExpr::Mem(Box::new(field_addr(IrExpr::Temp(this), 4 * (offset + 1))))
            };
            lower_field_chain(ctx, value, field.ty, rest, name.span)
        }
        NameKind::Type(decl_id) => {
            // A bare type name is never itself a value; it is only valid
            // here as the prefix of a static field access.
            let Some((first, tail)) = rest.split_first() else {
                return Err(CompileError::UnresolvedName(name.span));
            };
            let (_, field) = lookup_field(ctx.tables.decls, decl_id, &first.name).ok_or(CompileError::NoMatchingField(name.span))?;
            let label = ctx.tables.field_labels.get(&field.node).cloned().ok_or(CompileError::MissingLabel)?;
            let value = IrExpr::Mem(Box::new(IrExpr::Name(label)));
            lower_field_chain(ctx, value, field.ty, tail, name.span)
        }
    }
}

fn lower_field_chain(ctx: &mut Ctx, mut value: IrExpr, mut ty: Type, rest: &[Ident], span: Span) -> CompileResult<IrExpr> {
    for seg in rest {
        value = lower_one_field(ctx, value, &mut ty, &seg.name, span)?;
    }
    Ok(value)
}

fn lower_one_field(ctx: &mut Ctx, value: IrExpr, ty: &mut Type, field_name: &str, span: Span) -> CompileResult<IrExpr> {
    if let Type::Array(_) = ty {
        if field_name == "length" {
            *ty = Type::Primitive(Primitive::Int);
            return Ok(IrExpr::Mem(Box::new(field_addr(value, ARRAY_LENGTH_OFFSET))));
        }
    }
    let Type::Reference(owner) = *ty else {
        return Err(CompileError::NoMatchingField(span));
    };
    let (declaring, field) = lookup_field(ctx.tables.decls, owner, field_name).ok_or(CompileError::NoMatchingField(span))?;
    let layout = &ctx.tables.layouts[&declaring];
    let offset = layout.field_offset(field_name).ok_or(CompileError::NoMatchingField(span))? as i32;
    *ty = field.ty;
    Ok(IrExpr::Mem(Box::new(field_addr(value, 4 * (offset + 1)))))
}

fn lower_field_access(ctx: &mut Ctx, target: &Expr, name: &Ident, span: Span) -> CompileResult<IrExpr> {
    let target_ir = lower_expr(ctx, target)?;
    let mut target_ty = ctx
        .tables
        .resolutions
        .expr_types
        .get(&target.id())
        .cloned()
        .ok_or(CompileError::NoMatchingField(span))?;
    lower_one_field(ctx, target_ir, &mut target_ty, &name.name, span)
}

fn lower_array_access(ctx: &mut Ctx, array: &Expr, index: &Expr, span: Span) -> CompileResult<IrExpr> {
    let array_ir = lower_expr(ctx, array)?;
    let index_ir = lower_expr(ctx, index)?;
    let array_t = ctx.temps.fresh();
    let index_t = ctx.temps.fresh();
    let ok_label = ctx.labelgen.fresh("bounds_ok");
    let inrange_label = Label(format!("{}_inrange", ok_label.0));
    let fail_label = ctx.labelgen.fresh("bounds_fail");
    let checks = IrStmt::Seq(vec![
        IrStmt::Move(IrExpr::Temp(array_t), array_ir),
        IrStmt::Move(IrExpr::Temp(index_t), index_ir),
        IrStmt::CJump(RelOp::Lt, IrExpr::Temp(index_t), IrExpr::Const(0), fail_label.clone(), ok_label.clone()),
        IrStmt::Label(ok_label),
        IrStmt::CJump(
            RelOp::Lt,
            IrExpr::Temp(index_t),
            IrExpr::Mem(Box::new(field_addr(IrExpr::Temp(array_t), ARRAY_LENGTH_OFFSET))),
            inrange_label.clone(),
            fail_label.clone(),
        ),
        IrStmt::Jump(inrange_label.clone()),
        IrStmt::Label(fail_label),
        IrStmt::Exp(IrExpr::Call(Box::new(IrExpr::Name(Label("__exception".to_string()))), vec![])),
        IrStmt::Label(inrange_label),
    ]);
    let addr = IrExpr::Binop(
        BinOp::Add,
        Box::new(field_addr(IrExpr::Temp(array_t), ARRAY_ELEMENTS_OFFSET)),
        Box::new(IrExpr::Binop(BinOp::Mul, Box::new(IrExpr::Temp(index_t)), Box::new(IrExpr::Const(4)))),
    );
    let _ = span;
    Ok(IrExpr::Eseq(Box::new(checks), Box::new(IrExpr::Mem(Box::new(addr)))))
}

fn lower_new_array(ctx: &mut Ctx, _id: NodeId, size: &Expr) -> CompileResult<IrExpr> {
    let size_ir = lower_expr(ctx, size)?;
    let size_t = ctx.temps.fresh();
    let obj = ctx.temps.fresh();
    let bytes = IrExpr::Binop(
        BinOp::Add,
        Box::new(IrExpr::Const(ARRAY_ELEMENTS_OFFSET)),
        Box::new(IrExpr::Binop(BinOp::Mul, Box::new(IrExpr::Temp(size_t)), Box::new(IrExpr::Const(4)))),
    );
    let stmts = IrStmt::Seq(vec![
        IrStmt::Move(IrExpr::Temp(size_t), size_ir),
        IrStmt::Move(IrExpr::Temp(obj), IrExpr::Call(Box::new(IrExpr::Name(Label("__malloc".to_string()))), vec![bytes])),
        IrStmt::Move(IrExpr::Mem(Box::new(field_addr(IrExpr::Temp(obj), ARRAY_LENGTH_OFFSET))), IrExpr::Temp(size_t)),
    ]);
    Ok(IrExpr::Eseq(Box::new(stmts), Box::new(IrExpr::Temp(obj))))
}

fn lower_new_object(ctx: &mut Ctx, id: NodeId, class: &TypeRef, args: &[Expr], span: Span) -> CompileResult<IrExpr> {
    let Some(Type::Reference(class_id)) = ctx.tables.resolutions.expr_types.get(&id).cloned() else {
        return Err(CompileError::UnresolvedName(span));
    };
    let _ = class;

    let layout = &ctx.tables.layouts[&class_id];
    let obj = ctx.temps.fresh();
    let mut stmts = vec![IrStmt::Move(
        IrExpr::Temp(obj),
        IrExpr::Call(Box::new(IrExpr::Name(Label("__malloc".to_string()))), vec![IrExpr::Const(layout.size_bytes() as i32)]),
    )];
    stmts.push(IrStmt::Move(
        IrExpr::Mem(Box::new(IrExpr::Temp(obj))),
        IrExpr::Name(ctx.tables.class_labels.get(&class_id).cloned().ok_or(CompileError::MissingLabel)?),
    ));
    // Field initializers run against the freshly allocated object, not
    // whatever `this` this expression happens to be lowered inside, so
    // `this_temp` is swapped to `obj` for the duration of each one.
    let saved_this = ctx.this_temp;
    ctx.this_temp = Some(obj);
    for (i, field) in layout.fields.iter().enumerate() {
        let addr = field_addr(IrExpr::Temp(obj), 4 * (i as i32 + 1));
        let init = match ctx.tables.field_initializers.get(&field.node).cloned() {
            Some(init_expr) => lower_expr(ctx, &init_expr)?,
            None => IrExpr::Const(0),
        };
        stmts.push(IrStmt::Move(IrExpr::Mem(Box::new(addr)), init));
    }
    ctx.this_temp = saved_this;

    let arg_types: Vec<Type> = args.iter().map(|a| ctx.tables.resolutions.expr_types.get(&a.id()).cloned().unwrap_or(Type::Void)).collect();
    let ctors: Vec<(DeclId, joos_checker::decl::MethodInfo)> = match ctx.tables.decls.get(class_id) {
        Decl::Class(c) => c.constructors.iter().map(|m| (class_id, m.clone())).collect(),
        Decl::Interface(_) => Vec::new(),
    };
    let (_, ctor) = select_overload(ctx.tables.decls, &ctors, &arg_types).ok_or(CompileError::NoMatchingMethod(span))?;
    let ctor_label = ctx.tables.method_labels.get(&ctor.node).cloned().ok_or(CompileError::MissingLabel)?;

    let mut call_args = vec![IrExpr::Temp(obj)];
    for a in args {
        call_args.push(lower_expr(ctx, a)?);
    }
    stmts.push(IrStmt::Exp(IrExpr::Call(Box::new(IrExpr::Name(ctor_label)), call_args)));

    Ok(IrExpr::Eseq(Box::new(IrStmt::Seq(stmts)), Box::new(IrExpr::Temp(obj))))
}

fn lower_method_call(ctx: &mut Ctx, target: Option<&Expr>, method: &Ident, args: &[Expr], span: Span) -> CompileResult<IrExpr> {
    let arg_types: Vec<Type> = args.iter().map(|a| ctx.tables.resolutions.expr_types.get(&a.id()).cloned().unwrap_or(Type::Void)).collect();

    let (search_class, receiver) = match target {
        None => (ctx.class, if ctx.is_static { None } else { Some(IrExpr::Temp(ctx.this_temp.unwrap())) }),
        Some(t) => {
            let recv = lower_expr(ctx, t)?;
            let Some(Type::Reference(owner)) = ctx.tables.resolutions.expr_types.get(&t.id()).cloned() else {
                return Err(CompileError::NoMatchingMethod(span));
            };
            (owner, Some(recv))
        }
    };

    let candidates = lookup_methods(ctx.tables.decls, search_class, &method.name);
    let (_owner, info) = select_overload(ctx.tables.decls, &candidates, &arg_types).ok_or(CompileError::NoMatchingMethod(span))?;

    let mut call_args = Vec::new();
    if let Some(r) = &receiver {
        call_args.push(r.clone());
    }
    for a in args {
        call_args.push(lower_expr(ctx, a)?);
    }

    let target_expr = if info.modifiers.is_static || info.modifiers.native {
        IrExpr::Name(ctx.tables.method_labels.get(&info.node).cloned().ok_or(CompileError::MissingLabel)?)
    } else {
        // Virtual dispatch: load the method's slot out of the receiver's
        // dispatch vector, spec §4.6's "call through the object's own
        // vtable pointer, indexed by the method's color".
        let receiver = receiver.clone().expect("checker guarantees an instance receiver for a non-static call");
        let color = ctx.tables.dispatch.color_of(info.node).ok_or(CompileError::MissingLabel)?;
        let dv_ptr = IrExpr::Mem(Box::new(receiver));
        IrExpr::Mem(Box::new(field_addr(dv_ptr, 4 * color as i32)))
    };

    Ok(IrExpr::Call(Box::new(target_expr), call_args))
}

fn lower_instance_of(ctx: &mut Ctx, id: NodeId, operand: &Expr, span: Span) -> CompileResult<IrExpr> {
    let operand_ir = lower_expr(ctx, operand)?;
    let Some(Type::Reference(target)) = ctx.tables.resolutions.instanceof_targets.get(&id).cloned() else {
        // Array/primitive `instanceof` targets never reach codegen in a
        // well-typed program (the operand check already rejects primitives,
        // and Joos has no array-typed `instanceof` target).
        return Ok(IrExpr::Const(0));
    };
    let t = ctx.temps.fresh();
    let obj = ctx.temps.fresh();
    let mut checks = Vec::new();
    for class in ctx.tables.decls.ids() {
        if matches!(ctx.tables.decls.get(class), Decl::Class(_)) && ctx.tables.decls.extends_or_implements(class, target) {
            if let Some(label) = ctx.tables.class_labels.get(&class) {
                checks.push(label.clone());
            }
        }
    }
    let end = ctx.labelgen.fresh("instanceof_end");
    let check_start = Label(format!("{}_check", end.0));
    let matched = Label(format!("{}_matched", end.0));
    let not_matched = Label(format!("{}_not_matched", end.0));
    let null_label = ctx.labelgen.fresh("instanceof_null");
    let mut stmts = vec![
        IrStmt::Move(IrExpr::Temp(obj), operand_ir),
        IrStmt::CJump(RelOp::Eq, IrExpr::Temp(obj), IrExpr::Const(0), null_label.clone(), check_start.clone()),
        IrStmt::Label(check_start),
    ];
    for (i, label) in checks.iter().enumerate() {
        let next = Label(format!("{}_next{i}", end.0));
        stmts.push(IrStmt::CJump(RelOp::Eq, IrExpr::Mem(Box::new(IrExpr::Temp(obj))), IrExpr::Name(label.clone()), matched.clone(), next.clone()));
        stmts.push(IrStmt::Label(next));
    }
    stmts.push(IrStmt::Jump(not_matched.clone()));
    stmts.push(IrStmt::Label(matched));
    stmts.push(IrStmt::Move(IrExpr::Temp(t), IrExpr::Const(1)));
    stmts.push(IrStmt::Jump(end.clone()));
    stmts.push(IrStmt::Label(not_matched));
    stmts.push(IrStmt::Move(IrExpr::Temp(t), IrExpr::Const(0)));
    stmts.push(IrStmt::Jump(end.clone()));
    stmts.push(IrStmt::Label(null_label));
    stmts.push(IrStmt::Move(IrExpr::Temp(t), IrExpr::Const(0)));
    stmts.push(IrStmt::Label(end));
    let _ = span;
    Ok(IrExpr::Eseq(Box::new(IrStmt::Seq(stmts)), Box::new(IrExpr::Temp(t))))
}

fn lower_unary(ctx: &mut Ctx, op: UnaryOp, operand: &Expr) -> CompileResult<IrExpr> {
    let operand_ir = lower_expr(ctx, operand)?;
    Ok(match op {
        UnaryOp::Neg => IrExpr::Binop(BinOp::Sub, Box::new(IrExpr::Const(0)), Box::new(operand_ir)),
        UnaryOp::Not => IrExpr::Binop(BinOp::Sub, Box::new(IrExpr::Const(1)), Box::new(operand_ir)),
    })
}

fn lower_binary(ctx: &mut Ctx, id: NodeId, op: BinaryOp, left: &Expr, right: &Expr, span: Span) -> CompileResult<IrExpr> {
    use BinaryOp::*;
    match op {
        LazyAnd => lower_short_circuit(ctx, left, right, true),
        LazyOr => lower_short_circuit(ctx, left, right, false),
        Add => {
            let result_ty = ctx.tables.resolutions.expr_types.get(&id).cloned().unwrap_or(Type::Void);
            if result_ty == Type::String {
                lower_string_concat(ctx, left, right)
            } else {
                lower_arith(ctx, BinOp::Add, left, right)
            }
        }
        Sub => lower_arith(ctx, BinOp::Sub, left, right),
        Mul => lower_arith(ctx, BinOp::Mul, left, right),
        Div => lower_checked_div(ctx, BinOp::Div, left, right, span),
        Rem => lower_checked_div(ctx, BinOp::Rem, left, right, span),
        EagerAnd => lower_arith(ctx, BinOp::And, left, right),
        EagerOr => lower_arith(ctx, BinOp::Or, left, right),
        Lt | Le | Gt | Ge | Eq | Ne => lower_relational(ctx, op, left, right),
    }
}

fn lower_arith(ctx: &mut Ctx, op: BinOp, left: &Expr, right: &Expr) -> CompileResult<IrExpr> {
    let l = lower_expr(ctx, left)?;
    let r = lower_expr(ctx, right)?;
    Ok(IrExpr::Binop(op, Box::new(l), Box::new(r)))
}

/// Division and remainder need their operands in a fixed register pair for
/// `IDIV` (spec §4.9's pinned intervals); that pinning happens at tile
/// selection, not here — lowering only needs to evaluate left-to-right and
/// guard against a zero divisor.
fn lower_checked_div(ctx: &mut Ctx, op: BinOp, left: &Expr, right: &Expr, span: Span) -> CompileResult<IrExpr> {
    let l = lower_expr(ctx, left)?;
    let dividend = ctx.temps.fresh();
    let r = lower_expr(ctx, right)?;
    let divisor = ctx.temps.fresh();
    let ok = ctx.labelgen.fresh("div_ok");
    let fail = ctx.labelgen.fresh("div_fail");
    let guard = IrStmt::Seq(vec![
        IrStmt::Move(IrExpr::Temp(dividend), l),
        IrStmt::Move(IrExpr::Temp(divisor), r),
        IrStmt::CJump(RelOp::Eq, IrExpr::Temp(divisor), IrExpr::Const(0), fail.clone(), ok.clone()),
        IrStmt::Label(fail),
        IrStmt::Exp(IrExpr::Call(Box::new(IrExpr::Name(Label("__exception".to_string()))), vec![])),
        IrStmt::Label(ok),
    ]);
    let _ = span;
    Ok(IrExpr::Eseq(Box::new(guard), Box::new(IrExpr::Binop(op, Box::new(IrExpr::Temp(dividend)), Box::new(IrExpr::Temp(divisor))))))
}

fn lower_relational(ctx: &mut Ctx, op: BinaryOp, left: &Expr, right: &Expr) -> CompileResult<IrExpr> {
    let relop = match op {
        BinaryOp::Lt => RelOp::Lt,
        BinaryOp::Le => RelOp::Le,
        BinaryOp::Gt => RelOp::Gt,
        BinaryOp::Ge => RelOp::Ge,
        BinaryOp::Eq => RelOp::Eq,
        BinaryOp::Ne => RelOp::Ne,
        _ => unreachable!("only relational operators reach lower_relational"),
    };
    let l = lower_expr(ctx, left)?;
    let r = lower_expr(ctx, right)?;
    let t = ctx.temps.fresh();
    let tl = ctx.labelgen.fresh("rel_true");
    let fl = ctx.labelgen.fresh("rel_false");
    let end = ctx.labelgen.fresh("rel_end");
    let stmts = IrStmt::Seq(vec![
        IrStmt::CJump(relop, l, r, tl.clone(), fl.clone()),
        IrStmt::Label(tl),
        IrStmt::Move(IrExpr::Temp(t), IrExpr::Const(1)),
        IrStmt::Jump(end.clone()),
        IrStmt::Label(fl),
        IrStmt::Move(IrExpr::Temp(t), IrExpr::Const(0)),
        IrStmt::Label(end),
    ]);
    Ok(IrExpr::Eseq(Box::new(stmts), Box::new(IrExpr::Temp(t))))
}

fn lower_short_circuit(ctx: &mut Ctx, left: &Expr, right: &Expr, is_and: bool) -> CompileResult<IrExpr> {
    let l = lower_expr(ctx, left)?;
    let t = ctx.temps.fresh();
    let short_circuit = ctx.labelgen.fresh(if is_and { "and_short" } else { "or_short" });
    let eval_right = ctx.labelgen.fresh("eval_right");
    let end = ctx.labelgen.fresh("logic_end");

    // Evaluate `right` lazily, inside its own branch, so side effects in it
    // only run when Java's short-circuit semantics say they should.
    let mut stmts = Vec::new();
    if is_and {
        stmts.push(IrStmt::CJump(RelOp::Eq, l, IrExpr::Const(0), short_circuit.clone(), eval_right.clone()));
    } else {
        stmts.push(IrStmt::CJump(RelOp::Ne, l, IrExpr::Const(0), short_circuit.clone(), eval_right.clone()));
    }
    stmts.push(IrStmt::Label(eval_right));
    let r = lower_expr(ctx, right)?;
    stmts.push(IrStmt::Move(IrExpr::Temp(t), r));
    stmts.push(IrStmt::Jump(end.clone()));
    stmts.push(IrStmt::Label(short_circuit));
    stmts.push(IrStmt::Move(IrExpr::Temp(t), IrExpr::Const(if is_and { 0 } else { 1 })));
    stmts.push(IrStmt::Label(end));
    Ok(IrExpr::Eseq(Box::new(IrStmt::Seq(stmts)), Box::new(IrExpr::Temp(t))))
}

fn lower_string_concat(ctx: &mut Ctx, left: &Expr, right: &Expr) -> CompileResult<IrExpr> {
    let lt = ctx.tables.resolutions.expr_types.get(&left.id()).cloned().unwrap_or(Type::Void);
    let rt = ctx.tables.resolutions.expr_types.get(&right.id()).cloned().unwrap_or(Type::Void);
    let l = value_of_string(ctx, left, &lt)?;
    let r = value_of_string(ctx, right, &rt)?;
    Ok(IrExpr::Call(Box::new(IrExpr::Name(Label("NATIVEjava.lang.String.concat".to_string()))), vec![l, r]))
}

fn value_of_string(ctx: &mut Ctx, e: &Expr, ty: &Type) -> CompileResult<IrExpr> {
    let v = lower_expr(ctx, e)?;
    if *ty == Type::String {
        Ok(v)
    } else {
        Ok(IrExpr::Call(Box::new(IrExpr::Name(Label("NATIVEjava.lang.String.valueOf".to_string()))), vec![v]))
    }
}

fn lower_assign(ctx: &mut Ctx, target: &Expr, value: &Expr) -> CompileResult<IrExpr> {
    let target_ir = lower_expr(ctx, target)?;

    // JLS 15.26.1 (inherited by this Java subset): the assignment target's
    // own subexpressions (an array index, a field access's receiver)
    // evaluate before the right-hand side. Materializing the target's
    // address into a temp now, before lowering `value`, fixes that order in
    // the canonicalized statement sequence below — otherwise canonicalizing
    // `target_ir` in place (as the second `Move`'s destination) would run
    // its side effects after `value`'s.
    let mut stmts = Vec::new();
    let dst = match target_ir {
        IrExpr::Mem(addr) => {
            let addr_t = ctx.temps.fresh();
            stmts.push(IrStmt::Move(IrExpr::Temp(addr_t), *addr));
            IrExpr::Mem(Box::new(IrExpr::Temp(addr_t)))
        }
        other => other,
    };

    let value_ir = lower_expr(ctx, value)?;
    let t = ctx.temps.fresh();
    stmts.push(IrStmt::Move(IrExpr::Temp(t), value_ir));
    stmts.push(IrStmt::Move(dst, IrExpr::Temp(t)));
    Ok(IrExpr::Eseq(Box::new(IrStmt::Seq(stmts)), Box::new(IrExpr::Temp(t))))
}
