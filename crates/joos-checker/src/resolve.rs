//! Name disambiguation and expression/type resolution (spec §4.4), plus the
//! whole-program entry-point query.
//!
//! Every `Name` node left by the parser is a dotted run of simple names not
//! yet classified (see `joos_parser::ast::expression`'s doc comment); this
//! pass walks each method body and field initializer, classifying each run
//! against the scope chain, the current class's inherited fields, the
//! compilation unit's import context, and finally the package trie — the
//! five-step order spec §4.4 fixes — and records the outcome in a
//! [`Resolutions`] side table rather than mutating the AST, matching the
//! teacher's `expr_types` side-table design referenced from `ast::mod`.

use crate::decl::{Decl, DeclTable, FieldInfo, MethodInfo};
use crate::error::ResolveError;
use crate::linker::{resolve_type_name, resolve_type_ref, Program, UnitInfo};
use crate::trie::{ImportContext, PackageTrie};
use joos_parser::ast::*;
use joos_parser::Span;
use joos_types::{is_assignable_to, is_valid_cast, DeclId, Primitive, Type};
use rustc_hash::{FxHashMap, FxHashSet};

/// Per-node resolution facts the CFG builder and TIR lowering read instead of
/// re-walking the AST (spec §9's arena+index ownership model applied to
/// expressions).
#[derive(Default)]
pub struct Resolutions {
    pub expr_types: FxHashMap<NodeId, Type>,
    pub name_kinds: FxHashMap<NodeId, NameKind>,
    /// Declared type of each local variable and parameter, keyed by the
    /// `LocalVarDecl`/`Param` node itself. Added for `joos-compiler`'s TIR
    /// lowering, which needs a local's declared type to walk a field chain
    /// rooted at it (`a.b.c`) — no check within this crate needs it, since
    /// every use site already gets its own resolved type in `expr_types`.
    pub local_types: FxHashMap<NodeId, Type>,
    /// The resolved target type of an `instanceof` expression, keyed by the
    /// `InstanceOf` node itself. `expr_types` only ever holds `boolean` for
    /// this node (the expression's own result type), so `joos-compiler`
    /// needs a second table to recover which type it is testing against —
    /// every other codegen-relevant `TypeRef` (a cast's or `new`'s target)
    /// is already recoverable from `expr_types` because that resolved type
    /// *is* the expression's own result type.
    pub instanceof_targets: FxHashMap<NodeId, Type>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NameKind {
    Local,
    Field { owner: DeclId, is_static: bool },
    Type(DeclId),
}

pub fn resolve_program(program: &Program, units: &[CompilationUnit]) -> (Resolutions, Vec<ResolveError>) {
    let mut resolutions = Resolutions::default();
    let mut errors = Vec::new();
    for (unit_ast, unit_info) in units.iter().zip(program.units.iter()) {
        resolve_unit(program, unit_info, unit_ast, &mut resolutions, &mut errors);
    }
    (resolutions, errors)
}

/// Finds the program's unique `public static int test()` entry point
/// (spec §6 "runtime ABI").
pub fn find_entry_point(program: &Program) -> Result<DeclId, ResolveError> {
    let mut found = Vec::new();
    for id in program.decls.ids() {
        for m in program.decls.get(id).methods() {
            if m.name == "test"
                && m.modifiers.public
                && m.modifiers.is_static
                && m.return_type == Type::Primitive(Primitive::Int)
                && m.params.is_empty()
            {
                found.push(id);
            }
        }
    }
    match found.len() {
        1 => Ok(found[0]),
        count => Err(ResolveError::EntryPointCount { count }),
    }
}

fn resolve_unit(program: &Program, unit_info: &UnitInfo, unit_ast: &CompilationUnit, resolutions: &mut Resolutions, errors: &mut Vec<ResolveError>) {
    let TypeDecl::Class(class_ast) = &unit_ast.type_decl else { return };
    let Some(class_id) = program.decls.id_of_node(class_ast.id) else { return };

    for field in &class_ast.fields {
        if let Some(init) = &field.initializer {
            let order = class_field_order(&program.decls, class_id, &field.name.name);
            let mut ctx = Ctx {
                decls: &program.decls,
                trie: &program.trie,
                imports: &unit_info.imports,
                class: class_id,
                is_static: field.modifiers.is_static,
                current_field: order.map(|o| (field.name.name.clone(), o)),
                scope: Scope::new(),
                resolutions,
                errors,
            };
            resolve_expr(&mut ctx, init);
        }
    }

    for method in class_ast.constructors.iter().chain(class_ast.methods.iter()) {
        let Some(body) = &method.body else { continue };
        let mut ctx = Ctx {
            decls: &program.decls,
            trie: &program.trie,
            imports: &unit_info.imports,
            class: class_id,
            is_static: method.modifiers.is_static,
            current_field: None,
            scope: Scope::new(),
            resolutions,
            errors,
        };
        for param in &method.params {
            let ty = resolve_type_ref(&param.ty, &unit_info.imports, &program.trie, &program.decls).unwrap_or(Type::Void);
            ctx.resolutions.local_types.insert(param.id, ty.clone());
            ctx.scope.declare(&param.name.name, ty);
        }
        resolve_block(&mut ctx, body);
    }
}

fn class_field_order(decls: &DeclTable, class: DeclId, name: &str) -> Option<usize> {
    if let Decl::Class(c) = decls.get(class) {
        c.fields.iter().find(|f| f.name == name).map(|f| f.order)
    } else {
        None
    }
}

/// Block-scoped local-variable chain (spec §3 "Scope id").
struct Scope {
    frames: Vec<FxHashMap<String, Type>>,
}

impl Scope {
    fn new() -> Self {
        Scope { frames: vec![FxHashMap::default()] }
    }
    fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }
    fn pop(&mut self) {
        self.frames.pop();
    }
    fn declare(&mut self, name: &str, ty: Type) {
        self.frames.last_mut().expect("scope always has a frame").insert(name.to_string(), ty);
    }
    fn lookup(&self, name: &str) -> Option<Type> {
        self.frames.iter().rev().find_map(|f| f.get(name).cloned())
    }
}

struct Ctx<'a> {
    decls: &'a DeclTable,
    trie: &'a PackageTrie,
    imports: &'a ImportContext,
    class: DeclId,
    is_static: bool,
    /// `(name, declaration order)` of the instance field whose initializer is
    /// currently being resolved, for the forward-reference rule.
    current_field: Option<(String, usize)>,
    scope: Scope,
    resolutions: &'a mut Resolutions,
    errors: &'a mut Vec<ResolveError>,
}

fn resolve_block(ctx: &mut Ctx, block: &Block) {
    ctx.scope.push();
    for stmt in &block.statements {
        resolve_stmt(ctx, stmt);
    }
    ctx.scope.pop();
}

fn resolve_stmt(ctx: &mut Ctx, stmt: &Stmt) {
    match stmt {
        Stmt::Block(b) => resolve_block(ctx, b),
        Stmt::LocalVarDecl(d) => {
            let declared = resolve_type_ref(&d.ty, ctx.imports, ctx.trie, ctx.decls).unwrap_or(Type::Void);
            let init_ty = resolve_expr(ctx, &d.initializer);
            if !is_assignable_to(&declared, &init_ty, ctx.decls) {
                ctx.errors.push(ResolveError::TypeMismatch {
                    expected: declared.to_string(),
                    actual: init_ty.to_string(),
                    span: d.initializer.span(),
                });
            }
            ctx.resolutions.local_types.insert(d.id, declared.clone());
            ctx.scope.declare(&d.name.name, declared);
        }
        Stmt::If(s) => {
            resolve_expr(ctx, &s.condition);
            resolve_stmt(ctx, &s.then_branch);
            if let Some(e) = &s.else_branch {
                resolve_stmt(ctx, e);
            }
        }
        Stmt::While(s) => {
            resolve_expr(ctx, &s.condition);
            resolve_stmt(ctx, &s.body);
        }
        Stmt::For(s) => {
            ctx.scope.push();
            if let Some(init) = &s.init {
                resolve_stmt(ctx, init);
            }
            if let Some(cond) = &s.condition {
                resolve_expr(ctx, cond);
            }
            if let Some(update) = &s.update {
                resolve_stmt(ctx, update);
            }
            resolve_stmt(ctx, &s.body);
            ctx.scope.pop();
        }
        Stmt::Return(s) => {
            if let Some(e) = &s.value {
                resolve_expr(ctx, e);
            }
        }
        Stmt::Expression(s) => {
            resolve_expr(ctx, &s.expr);
        }
        Stmt::Null(..) => {}
    }
}

fn record(ctx: &mut Ctx, id: NodeId, ty: Type) -> Type {
    ctx.resolutions.expr_types.insert(id, ty.clone());
    ty
}

fn resolve_expr(ctx: &mut Ctx, expr: &Expr) -> Type {
    match expr {
        Expr::Literal { id, value, .. } => {
            let ty = match value {
                Literal::Int(_) => Type::Primitive(Primitive::Int),
                Literal::Char(_) => Type::Primitive(Primitive::Char),
                Literal::Str(_) => Type::String,
                Literal::Bool(_) => Type::Primitive(Primitive::Boolean),
                Literal::Null => Type::Null,
            };
            record(ctx, *id, ty)
        }
        Expr::This { id, span } => {
            if ctx.is_static {
                ctx.errors.push(ResolveError::StaticContextViolation { name: "this".to_string(), span: *span });
            }
            record(ctx, *id, Type::Reference(ctx.class))
        }
        Expr::Name(name) => {
            let ty = resolve_name(ctx, name, false);
            record(ctx, name.id, ty)
        }
        Expr::FieldAccess { id, target, name, span } => {
            let target_ty = resolve_expr(ctx, target);
            let explicit_this = matches!(target.as_ref(), Expr::This { .. });
            let ty = resolve_field_of(ctx, &target_ty, name, *span, explicit_this);
            record(ctx, *id, ty)
        }
        Expr::MethodCall { id, target, method, args, span } => {
            let arg_types: Vec<Type> = args.iter().map(|a| resolve_expr(ctx, a)).collect();
            let ty = resolve_call(ctx, target.as_deref(), method, &arg_types, *span);
            record(ctx, *id, ty)
        }
        Expr::NewObject { id, class, args, span } => {
            let arg_types: Vec<Type> = args.iter().map(|a| resolve_expr(ctx, a)).collect();
            let ty = match resolve_type_ref(class, ctx.imports, ctx.trie, ctx.decls) {
                Ok(ty @ Type::Reference(owner)) => {
                    let ctors: Vec<(DeclId, MethodInfo)> = match ctx.decls.get(owner) {
                        Decl::Class(c) => c.constructors.iter().map(|m| (owner, m.clone())).collect(),
                        Decl::Interface(_) => Vec::new(),
                    };
                    if select_overload(ctx.decls, &ctors, &arg_types).is_none() {
                        ctx.errors.push(ResolveError::NoMatchingMethod { name: ctx.decls.get(owner).simple_name().to_string(), span: *span });
                    }
                    ty
                }
                Ok(ty) => ty,
                Err(_) => {
                    ctx.errors.push(ResolveError::UnresolvedName { name: "<class>".to_string(), span: *span });
                    Type::Void
                }
            };
            record(ctx, *id, ty)
        }
        Expr::NewArray { id, element_type, size, span } => {
            let size_ty = resolve_expr(ctx, size);
            if !size_ty.is_numeric() {
                ctx.errors.push(ResolveError::TypeMismatch { expected: "int".to_string(), actual: size_ty.to_string(), span: *span });
            }
            let elem = resolve_type_ref(element_type, ctx.imports, ctx.trie, ctx.decls).unwrap_or(Type::Void);
            record(ctx, *id, Type::Array(Box::new(elem)))
        }
        Expr::ArrayAccess { id, array, index, span } => {
            let array_ty = resolve_expr(ctx, array);
            let index_ty = resolve_expr(ctx, index);
            if !index_ty.is_numeric() {
                ctx.errors.push(ResolveError::TypeMismatch { expected: "int".to_string(), actual: index_ty.to_string(), span: *span });
            }
            let ty = array_ty.array_element().cloned().unwrap_or_else(|| {
                ctx.errors.push(ResolveError::TypeMismatch { expected: "array".to_string(), actual: array_ty.to_string(), span: *span });
                Type::Void
            });
            record(ctx, *id, ty)
        }
        Expr::Cast { id, target_type, expr: inner, span } => {
            let from = resolve_expr(ctx, inner);
            let to = resolve_type_ref(target_type, ctx.imports, ctx.trie, ctx.decls).unwrap_or(Type::Void);
            if !is_valid_cast(&from, &to, ctx.decls) {
                ctx.errors.push(ResolveError::InvalidCast { from: from.to_string(), to: to.to_string(), span: *span });
            }
            record(ctx, *id, to)
        }
        Expr::InstanceOf { id, expr: inner, target_type, span } => {
            let operand = resolve_expr(ctx, inner);
            if operand.is_primitive() {
                ctx.errors.push(ResolveError::TypeMismatch { expected: "reference type".to_string(), actual: operand.to_string(), span: *span });
            }
            if let Ok(target) = resolve_type_ref(target_type, ctx.imports, ctx.trie, ctx.decls) {
                ctx.resolutions.instanceof_targets.insert(*id, target);
            }
            record(ctx, *id, Type::Primitive(Primitive::Boolean))
        }
        Expr::Unary { id, op, operand, span } => {
            let operand_ty = resolve_expr(ctx, operand);
            let ty = match op {
                UnaryOp::Neg => {
                    if !operand_ty.is_numeric() {
                        ctx.errors.push(ResolveError::TypeMismatch { expected: "numeric".to_string(), actual: operand_ty.to_string(), span: *span });
                    }
                    Type::Primitive(Primitive::Int)
                }
                UnaryOp::Not => {
                    if operand_ty != Type::Primitive(Primitive::Boolean) {
                        ctx.errors.push(ResolveError::TypeMismatch { expected: "boolean".to_string(), actual: operand_ty.to_string(), span: *span });
                    }
                    Type::Primitive(Primitive::Boolean)
                }
            };
            record(ctx, *id, ty)
        }
        Expr::Binary { id, op, left, right, span } => {
            let lt = resolve_expr(ctx, left);
            let rt = resolve_expr(ctx, right);
            let ty = resolve_binary(ctx, *op, &lt, &rt, *span);
            record(ctx, *id, ty)
        }
        Expr::Assign { id, target, value, .. } => {
            let target_ty = resolve_assign_target(ctx, target);
            let value_ty = resolve_expr(ctx, value);
            if !is_assignable_to(&target_ty, &value_ty, ctx.decls) {
                ctx.errors.push(ResolveError::TypeMismatch {
                    expected: target_ty.to_string(),
                    actual: value_ty.to_string(),
                    span: target.span(),
                });
            }
            record(ctx, *id, target_ty)
        }
    }
}

/// Resolves an assignment's LHS. Per spec §4.4 it must be an expression name,
/// field access, or array access; a `Name` on the LHS additionally satisfies
/// the forward-reference rule's "or the reference is the left-hand side of
/// an assignment" exception.
fn resolve_assign_target(ctx: &mut Ctx, target: &Expr) -> Type {
    match target {
        Expr::Name(name) => resolve_name(ctx, name, true),
        Expr::FieldAccess { .. } | Expr::ArrayAccess { .. } => resolve_expr(ctx, target),
        other => {
            ctx.errors.push(ResolveError::UnresolvedName { name: "<assignment target>".to_string(), span: other.span() });
            resolve_expr(ctx, other)
        }
    }
}

/// Disambiguates a maximal contiguous run of simple names (spec §4.4 steps
/// 1-5). `is_assign_lhs` implements the forward-reference rule's exception
/// for `g = …`.
fn resolve_name(ctx: &mut Ctx, name: &Name, is_assign_lhs: bool) -> Type {
    let head = &name.segments[0];
    let rest = &name.segments[1..];

    // Step 1: local variable or parameter.
    if let Some(ty) = ctx.scope.lookup(&head.name) {
        ctx.resolutions.name_kinds.insert(name.id, NameKind::Local);
        return resolve_field_chain(ctx, ty, rest);
    }

    // Step 2: a field of the current class's inheritance closure.
    if let Some((owner, field)) = lookup_field(ctx.decls, ctx.class, &head.name) {
        if ctx.is_static && !field.modifiers.is_static {
            ctx.errors.push(ResolveError::StaticContextViolation { name: head.name.clone(), span: head.span });
        }
        if let Some((current_name, current_order)) = &ctx.current_field {
            // Only meaningful when `field` and the field currently being
            // initialized share the same per-class declaration order
            // (`owner == ctx.class`) — an inherited field's order is a
            // position in its own declaring class, not a position on this
            // class's number line, and spec §4.6 guarantees inherited fields
            // are always initialized before local ones regardless. Static
            // fields are also exempt: the rule only concerns forward
            // references to another instance field.
            let is_forward =
                owner == ctx.class && !field.modifiers.is_static && field.order >= *current_order && field.name != *current_name;
            if is_forward && !is_assign_lhs {
                ctx.errors.push(ResolveError::ForwardReference { name: head.name.clone(), span: head.span });
            }
        }
        ctx.resolutions.name_kinds.insert(name.id, NameKind::Field { owner, is_static: field.modifiers.is_static });
        return resolve_field_chain(ctx, field.ty, rest);
    }

    // Steps 3/4: the longest prefix resolving to a type declaration, via the
    // import context (step 3) or the package trie (step 4) — `resolve_type_name`
    // already tries both in that order for a whole segment run.
    for split in (1..=name.segments.len()).rev() {
        let prefix: Vec<String> = name.segments[..split].iter().map(|i| i.name.clone()).collect();
        if let Ok(decl_id) = resolve_type_name(&prefix, ctx.imports, ctx.trie, name.span) {
            ctx.resolutions.name_kinds.insert(name.id, NameKind::Type(decl_id));
            let remaining = &name.segments[split..];
            if remaining.is_empty() {
                return Type::Void;
            }
            let field_name = &remaining[0];
            if let Some((_, field)) = lookup_field(ctx.decls, decl_id, &field_name.name) {
                if !field.modifiers.is_static {
                    ctx.errors.push(ResolveError::StaticThroughInstance { name: field_name.name.clone(), span: field_name.span });
                }
                return resolve_field_chain(ctx, field.ty, &remaining[1..]);
            }
            ctx.errors.push(ResolveError::UnresolvedName { name: field_name.name.clone(), span: field_name.span });
            return Type::Void;
        }
    }

    ctx.errors.push(ResolveError::UnresolvedName { name: head.name.clone(), span: head.span });
    Type::Void
}

fn resolve_field_chain(ctx: &mut Ctx, mut ty: Type, rest: &[Ident]) -> Type {
    for seg in rest {
        ty = resolve_field_of(ctx, &ty, seg, seg.span, false);
    }
    ty
}

fn resolve_field_of(ctx: &mut Ctx, target_ty: &Type, field: &Ident, span: Span, explicit_this: bool) -> Type {
    if let Type::Array(_) = target_ty {
        if field.name == "length" {
            return Type::Primitive(Primitive::Int);
        }
    }
    if let Type::Reference(owner) = target_ty {
        if let Some((_, info)) = lookup_field(ctx.decls, *owner, &field.name) {
            if ctx.is_static && !explicit_this && !info.modifiers.is_static {
                ctx.errors.push(ResolveError::StaticContextViolation { name: field.name.clone(), span });
            }
            return info.ty;
        }
    }
    ctx.errors.push(ResolveError::UnresolvedName { name: field.name.clone(), span });
    Type::Void
}

/// Resolves a (possibly qualified) method call to its return type, reporting
/// `NoMatchingMethod` if no inherited overload's parameters accept the
/// supplied argument types.
fn resolve_call(ctx: &mut Ctx, target: Option<&Expr>, method: &Ident, arg_types: &[Type], span: Span) -> Type {
    let (search_class, static_only) = match target {
        None => (ctx.class, ctx.is_static),
        Some(t) => {
            let target_ty = resolve_expr(ctx, t);
            match target_ty {
                Type::Reference(owner) => (owner, false),
                _ => {
                    ctx.errors.push(ResolveError::UnresolvedName { name: method.name.clone(), span });
                    return Type::Void;
                }
            }
        }
    };
    let candidates = lookup_methods(ctx.decls, search_class, &method.name);
    if static_only {
        if let Some(m) = candidates.iter().find(|(_, m)| !m.modifiers.is_static) {
            ctx.errors.push(ResolveError::StaticContextViolation { name: m.1.name.clone(), span });
        }
    }
    match select_overload(ctx.decls, &candidates, arg_types) {
        Some((_, m)) => m.return_type,
        None => {
            ctx.errors.push(ResolveError::NoMatchingMethod { name: method.name.clone(), span });
            Type::Void
        }
    }
}

fn resolve_binary(ctx: &mut Ctx, op: BinaryOp, lt: &Type, rt: &Type, span: Span) -> Type {
    use BinaryOp::*;
    let boolean = Type::Primitive(Primitive::Boolean);
    let mismatch = |ctx: &mut Ctx<'_>, expected: &str| {
        ctx.errors.push(ResolveError::TypeMismatch { expected: expected.to_string(), actual: format!("{lt}, {rt}"), span });
    };
    match op {
        LazyAnd | LazyOr | EagerAnd | EagerOr => {
            if *lt != boolean || *rt != boolean {
                if lt.is_numeric() && rt.is_numeric() && matches!(op, EagerAnd | EagerOr) {
                    return Type::Primitive(Primitive::Int);
                }
                mismatch(ctx, "boolean");
            }
            boolean
        }
        Lt | Le | Gt | Ge => {
            if !lt.is_numeric() || !rt.is_numeric() {
                mismatch(ctx, "numeric");
            }
            boolean
        }
        Eq | Ne => {
            if lt.is_numeric() && rt.is_numeric() {
                return boolean;
            }
            if !is_valid_cast(lt, rt, ctx.decls) && !is_valid_cast(rt, lt, ctx.decls) {
                mismatch(ctx, "comparable types");
            }
            boolean
        }
        Add if *lt == Type::String || *rt == Type::String => Type::String,
        Add | Sub | Mul | Div | Rem => {
            if !lt.is_numeric() || !rt.is_numeric() {
                mismatch(ctx, "numeric");
            }
            Type::Primitive(Primitive::Int)
        }
    }
}

fn lookup_field(decls: &DeclTable, class: DeclId, name: &str) -> Option<(DeclId, FieldInfo)> {
    let mut current = Some(class);
    let mut seen = FxHashSet::default();
    while let Some(id) = current {
        if !seen.insert(id) {
            break;
        }
        match decls.get(id) {
            Decl::Class(c) => {
                if let Some(f) = c.fields.iter().find(|f| f.name == name) {
                    return Some((id, f.clone()));
                }
                current = c.super_class;
            }
            Decl::Interface(_) => break,
        }
    }
    None
}

fn lookup_methods(decls: &DeclTable, class: DeclId, name: &str) -> Vec<(DeclId, MethodInfo)> {
    let mut result = Vec::new();
    let mut stack = vec![class];
    let mut seen = FxHashSet::default();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let decl = decls.get(id);
        for m in decl.methods() {
            if m.name == name && !m.is_constructor {
                result.push((id, m.clone()));
            }
        }
        match decl {
            Decl::Class(c) => {
                if let Some(s) = c.super_class {
                    stack.push(s);
                }
                stack.extend(c.interfaces.iter().copied());
            }
            Decl::Interface(i) => stack.extend(i.extends.iter().copied()),
        }
    }
    result
}

fn select_overload(decls: &DeclTable, candidates: &[(DeclId, MethodInfo)], arg_types: &[Type]) -> Option<(DeclId, MethodInfo)> {
    candidates
        .iter()
        .find(|(_, m)| {
            m.params.len() == arg_types.len()
                && m.params.iter().zip(arg_types).all(|(p, a)| *a == p.ty || is_assignable_to(&p.ty, a, decls))
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linker::link;
    use joos_parser::{parse_file, FileId};

    fn link_src(src: &str) -> (Program, Vec<CompilationUnit>) {
        let units = vec![parse_file(FileId(0), src).expect("parse")];
        let program = link(&units).expect("link");
        (program, units)
    }

    #[test]
    fn local_variable_shadows_field() {
        let (program, units) = link_src(
            "class A { public A() {} public int x; public int m() { int x = 1; return x; } }",
        );
        let (_, errors) = resolve_program(&program, &units);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn undefined_name_is_an_error() {
        let (program, units) = link_src("class A { public A() {} public int m() { return ghost; } }");
        let (_, errors) = resolve_program(&program, &units);
        assert!(errors.iter().any(|e| matches!(e, ResolveError::UnresolvedName { .. })));
    }

    #[test]
    fn static_method_cannot_read_instance_field() {
        let (program, units) = link_src(
            "class A { public A() {} public int x; public static int m() { return x; } }",
        );
        let (_, errors) = resolve_program(&program, &units);
        assert!(errors.iter().any(|e| matches!(e, ResolveError::StaticContextViolation { .. })));
    }

    #[test]
    fn string_concatenation_with_int_yields_string() {
        let (program, units) = link_src(
            "class A { public A() {} public String m() { return \"x\" + 1; } }",
        );
        let (resolutions, errors) = resolve_program(&program, &units);
        assert!(errors.is_empty(), "{errors:?}");
        let found = resolutions.expr_types.values().any(|t| *t == Type::String);
        assert!(found);
    }

    #[test]
    fn entry_point_requires_exactly_one_test_method() {
        let (program, _) = link_src("class A { public A() {} public static int test() { return 0; } }");
        assert!(find_entry_point(&program).is_ok());
    }

    #[test]
    fn entry_point_missing_is_an_error() {
        let (program, _) = link_src("class A { public A() {} }");
        assert!(find_entry_point(&program).is_err());
    }
}
