//! AST → tree-IR lowering (spec §4.6).
//!
//! Grounded on `joos_checker::resolve`'s expression walk — same five-step
//! name lookup, same field/method search order — but emitting
//! `crate::ir::{Expr, Stmt}` instead of recording a type in a side table.
//! `lookup_field`/`lookup_methods`/`select_overload` below are
//! re-implementations of the identically-named functions in
//! `joos_checker::resolve`, not calls into them: those are private to that
//! module, so this crate resolves the boundary by reading only the public
//! `Resolutions` side table and the public `DeclTable` arena it was built
//! from, never by re-resolving a syntactic `TypeRef`.

mod expr;
mod stmt;

use crate::error::{CompileError, CompileResult};
use crate::ir::{Label, LabelGen, Stmt as IrStmt, Temp, TempGen};
use crate::layout::{build_layout, build_dispatch_vectors, ClassLayout, DispatchVectors};
use crate::mangle::LabelTable;
use joos_checker::decl::{Decl, DeclTable, FieldInfo, MethodInfo};
use joos_checker::linker::Program;
use joos_checker::resolve::Resolutions;
use joos_parser::ast::{CompilationUnit, NodeId, TypeDecl};
use joos_types::{is_assignable_to, DeclId, Type};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;

/// Re-implementation of `joos_checker::resolve::lookup_field` (private
/// there): walks `class`'s superclass chain for the nearest declaration of
/// `name`.
pub(crate) fn lookup_field(decls: &DeclTable, class: DeclId, name: &str) -> Option<(DeclId, FieldInfo)> {
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

/// Re-implementation of `joos_checker::resolve::lookup_methods`.
pub(crate) fn lookup_methods(decls: &DeclTable, class: DeclId, name: &str) -> Vec<(DeclId, MethodInfo)> {
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

/// Re-implementation of `joos_checker::resolve::select_overload`: first
/// declaration-order candidate whose parameters all accept the argument
/// types.
pub(crate) fn select_overload(decls: &DeclTable, candidates: &[(DeclId, MethodInfo)], arg_types: &[Type]) -> Option<(DeclId, MethodInfo)> {
    candidates
        .iter()
        .find(|(_, m)| {
            m.params.len() == arg_types.len()
                && m.params.iter().zip(arg_types).all(|(p, a)| *a == p.ty || is_assignable_to(&p.ty, a, decls))
        })
        .cloned()
}

/// Everything a method's or field-initializer's lowering needs, shared
/// read-only across the whole program. The string-literal accumulator uses
/// interior mutability because every method lowered anywhere in the program
/// shares one `.data` label counter, while `Tables` itself is handed out as
/// a plain shared reference.
pub(crate) struct Tables<'a> {
    pub decls: &'a DeclTable,
    pub resolutions: &'a Resolutions,
    pub layouts: &'a FxHashMap<DeclId, ClassLayout>,
    pub dispatch: &'a DispatchVectors,
    pub class_labels: &'a FxHashMap<DeclId, Label>,
    pub method_labels: &'a FxHashMap<NodeId, Label>,
    pub field_labels: &'a FxHashMap<NodeId, Label>,
    /// An instance field's declared initializer expression, keyed by its
    /// `FieldDecl` node — `FieldInfo` itself carries no initializer, so
    /// `NewObject` lowering needs this index to run each field's own
    /// initializer instead of always zeroing it.
    pub field_initializers: &'a FxHashMap<NodeId, joos_parser::ast::Expr>,
    pub strings: RefCell<Vec<(Label, String)>>,
}

impl<'a> Tables<'a> {
    fn intern_string(&self, value: &str) -> Label {
        let mut strings = self.strings.borrow_mut();
        let label = Label(format!(".Lstr{}", strings.len()));
        strings.push((label.clone(), value.to_string()));
        label
    }
}

pub struct LoweredMethod {
    pub label: Label,
    pub num_args: usize,
    pub body: Vec<IrStmt>,
}

pub struct LoweredClass {
    pub decl: DeclId,
    pub label: Label,
    /// One entry per dispatch-vector color; `None` where this class's
    /// hierarchy never fills that slot.
    pub dispatch_vector: Vec<Option<Label>>,
    pub methods: Vec<LoweredMethod>,
}

pub struct LoweredProgram {
    pub classes: Vec<LoweredClass>,
    /// Every static field's storage label, zero-initialized (spec §4.10
    /// `.data`).
    pub static_fields: Vec<Label>,
    /// Static field initializers from every class, concatenated in
    /// compilation-unit order — spec §4.10's "`_start` runs the
    /// canonicalized static initializers, then the entry point". Joos
    /// defines no cross-class static-initialization order beyond this, so
    /// unit order (source order) is the simplest deterministic choice.
    pub static_init: Vec<IrStmt>,
    pub entry_label: Label,
    pub string_literals: Vec<(Label, String)>,
}

fn method_info_by_node<'a>(decls: &'a DeclTable, class: DeclId, node: NodeId) -> Option<&'a MethodInfo> {
    match decls.get(class) {
        Decl::Class(c) => c.constructors.iter().chain(c.methods.iter()).find(|m| m.node == node),
        Decl::Interface(i) => i.methods.iter().find(|m| m.node == node),
    }
}

/// Runs object-layout/dispatch-vector construction, then lowers every class
/// in `units` to tree IR (spec §4.6), canonicalizing each method body in
/// place (spec §4.7).
pub fn lower_program(program: &mut Program, resolutions: &Resolutions, units: &[CompilationUnit], entry_point: DeclId) -> CompileResult<LoweredProgram> {
    let dispatch = build_dispatch_vectors(&mut program.decls);

    let class_ids: Vec<DeclId> = program.decls.ids().filter(|&id| matches!(program.decls.get(id), Decl::Class(_))).collect();
    let layouts: FxHashMap<DeclId, ClassLayout> = class_ids.iter().map(|&id| (id, build_layout(&program.decls, id))).collect();

    let mut labels = LabelTable::new();
    let mut class_labels = FxHashMap::default();
    for &id in &class_ids {
        if let Decl::Class(c) = program.decls.get(id) {
            class_labels.insert(id, Label(labels.class_label(c.node, &c.fully_qualified_name)));
        }
    }

    let mut method_labels: FxHashMap<NodeId, Label> = FxHashMap::default();
    let mut field_labels: FxHashMap<NodeId, Label> = FxHashMap::default();
    for &id in &class_ids {
        let Decl::Class(c) = program.decls.get(id) else { continue };
        for f in &c.fields {
            let name = format!("{}.{}", c.fully_qualified_name, f.name);
            field_labels.insert(f.node, Label(labels.field_label(f.node, &name, f.modifiers.is_static)));
        }
        for m in c.constructors.iter().chain(c.methods.iter()) {
            let params: Vec<String> = m.params.iter().map(|p| p.ty.to_string()).collect();
            let name = format!("{}.{}({})", c.fully_qualified_name, m.name, params.join(","));
            method_labels.insert(m.node, Label(labels.method_label(m.node, &name, m.modifiers.is_static, m.modifiers.native)));
        }
    }

    let mut field_initializers: FxHashMap<NodeId, joos_parser::ast::Expr> = FxHashMap::default();
    for unit in units {
        let TypeDecl::Class(class_ast) = &unit.type_decl else { continue };
        for f in &class_ast.fields {
            if !f.modifiers.is_static {
                if let Some(init) = &f.initializer {
                    field_initializers.insert(f.id, init.clone());
                }
            }
        }
    }

    let tables = Tables {
        decls: &program.decls,
        resolutions,
        layouts: &layouts,
        dispatch: &dispatch,
        class_labels: &class_labels,
        method_labels: &method_labels,
        field_labels: &field_labels,
        field_initializers: &field_initializers,
        strings: RefCell::new(Vec::new()),
    };

    let mut classes = Vec::new();
    let mut static_fields = Vec::new();
    let mut static_init = Vec::new();
    for unit in units {
        let TypeDecl::Class(class_ast) = &unit.type_decl else { continue };
        let Some(class_id) = tables.decls.id_of_node(class_ast.id) else { continue };
        let Decl::Class(info) = tables.decls.get(class_id) else { continue };

        for f in &info.fields {
            if f.modifiers.is_static {
                static_fields.push(tables.field_labels[&f.node].clone());
            }
        }

        let mut methods = Vec::new();
        for m in class_ast.constructors.iter().chain(class_ast.methods.iter()) {
            let Some(info) = method_info_by_node(tables.decls, class_id, m.id) else { continue };
            if let Some(lowered) = lower_method(&tables, class_id, m, info)? {
                methods.push(lowered);
            }
        }

        for f in &class_ast.fields {
            if f.modifiers.is_static {
                if let Some(init) = &f.initializer {
                    static_init.extend(lower_static_field_init(&tables, class_id, f.id, init)?);
                }
            }
        }

        let slots = tables.dispatch.slots(class_id);
        let dispatch_vector = slots
            .into_iter()
            .map(|slot| slot.and_then(|node| tables.method_labels.get(&node).cloned()))
            .collect();

        classes.push(LoweredClass { decl: class_id, label: tables.class_labels[&class_id].clone(), dispatch_vector, methods });
    }

    let Decl::Class(entry_class) = tables.decls.get(entry_point) else {
        return Err(CompileError::MissingLabel);
    };
    let entry_method = entry_class
        .methods
        .iter()
        .find(|m| m.name == "test" && m.modifiers.is_static)
        .ok_or(CompileError::MissingLabel)?;
    let entry_label = tables.method_labels.get(&entry_method.node).cloned().ok_or(CompileError::MissingLabel)?;

    Ok(LoweredProgram {
        classes,
        static_fields,
        static_init,
        entry_label,
        string_literals: tables.strings.into_inner(),
    })
}

fn lower_method(tables: &Tables, class_id: DeclId, m: &joos_parser::ast::MethodDecl, info: &MethodInfo) -> CompileResult<Option<LoweredMethod>> {
    let Some(body) = &m.body else {
        // Abstract, interface, and native methods have no TIR to generate;
        // their labels are only ever referenced as call targets.
        return Ok(None);
    };
    let label = tables.method_labels.get(&m.id).cloned().ok_or(CompileError::MissingLabel)?;

    let mut temps = TempGen::new();
    let mut labelgen = LabelGen::new();
    let is_static = m.modifiers.is_static;
    let this_temp = if is_static { None } else { Some(temps.fresh()) };

    let mut scope: FxHashMap<String, (Temp, Type)> = FxHashMap::default();
    let mut num_args = 0;
    if this_temp.is_some() {
        num_args += 1;
    }
    for p in &m.params {
        let t = temps.fresh();
        num_args += 1;
        let ty = tables.resolutions.local_types.get(&p.id).cloned().unwrap_or(Type::Void);
        scope.insert(p.name.name.clone(), (t, ty));
    }

    let mut ctx = expr::Ctx { tables, class: class_id, is_static, this_temp, scope, temps: &mut temps, labelgen: &mut labelgen };

    let mut out = Vec::new();
    stmt::lower_block(&mut ctx, body, &mut out)?;
    if info.return_type == Type::Void {
        out.push(IrStmt::Return(None));
    }

    let canon_body = crate::canon::canonicalize(IrStmt::Seq(out));
    Ok(Some(LoweredMethod { label, num_args, body: canon_body }))
}

fn lower_static_field_init(tables: &Tables, class_id: DeclId, field_node: NodeId, init: &joos_parser::ast::Expr) -> CompileResult<Vec<IrStmt>> {
    let mut temps = TempGen::new();
    let mut labelgen = LabelGen::new();
    let mut ctx = expr::Ctx { tables, class: class_id, is_static: true, this_temp: None, scope: FxHashMap::default(), temps: &mut temps, labelgen: &mut labelgen };
    let value = expr::lower_expr(&mut ctx, init)?;
    let label = tables.field_labels.get(&field_node).cloned().ok_or(CompileError::MissingLabel)?;
    let assign = IrStmt::Move(crate::ir::Expr::Mem(Box::new(crate::ir::Expr::Name(label))), value);
    Ok(crate::canon::canonicalize(assign))
}
