//! Type linker (spec §4.2): resolves every syntactic type reference to a
//! declaration, building the [`DeclTable`] and [`PackageTrie`] that every
//! later pass reads.
//!
//! Two passes over the whole program, mirroring spec §9's ownership rule
//! that the type linker is the sole owner of the trie and of resolution
//! slots during its run: pass one inserts a skeleton declaration per class/
//! interface (so forward references across files resolve); pass two fills
//! in super-class/interfaces/field-types/method-signatures now that every
//! name in the program has an id.

use crate::decl::{ClassInfo, Decl, DeclTable, FieldInfo, InterfaceInfo, MethodInfo, ParamInfo, WellKnown};
use crate::error::LinkError;
use crate::trie::{Binding, ImportContext, Lookup, PackageTrie};
use joos_parser::ast::*;
use joos_parser::FileId;
use joos_types::{DeclId, Primitive, Type};

#[derive(Debug)]
pub struct UnitInfo {
    pub file: FileId,
    pub package: Vec<String>,
    pub imports: ImportContext,
    pub top_level: DeclId,
}

#[derive(Debug)]
pub struct Program {
    pub decls: DeclTable,
    pub trie: PackageTrie,
    pub units: Vec<UnitInfo>,
}

pub fn link(units: &[CompilationUnit]) -> Result<Program, Vec<LinkError>> {
    let mut decls = DeclTable::new();
    let mut trie = PackageTrie::new();
    let mut errors = Vec::new();

    let well_known = install_well_known(&mut decls, &mut trie);
    decls.set_well_known(well_known);

    // Pass 1: skeleton declarations, so every name in the program has a
    // DeclId before any field/method type is resolved.
    let mut skeletons = Vec::with_capacity(units.len());
    for unit in units {
        let package = unit.package.as_ref().map(|p| names(&p.path)).unwrap_or_default();
        let (node, id) = insert_skeleton(&mut decls, &mut trie, &package, unit, &mut errors);
        skeletons.push((package, id, node));
    }

    // Pass 2: import contexts, then resolve every super/interface/field/
    // param/return TypeRef against them.
    let mut unit_infos = Vec::with_capacity(units.len());
    for (unit, (package, top_level, _)) in units.iter().zip(skeletons.iter()) {
        let ctx = build_import_context(unit, &package, *top_level, &decls, &trie, &mut errors);
        resolve_unit(unit, &ctx, &mut decls, &trie, &mut errors);
        unit_infos.push(UnitInfo { file: unit.file, package: package.clone(), imports: ctx, top_level: *top_level });
    }

    if errors.is_empty() {
        Ok(Program { decls, trie, units: unit_infos })
    } else {
        Err(errors)
    }
}

fn names(idents: &[Ident]) -> Vec<String> {
    idents.iter().map(|i| i.name.clone()).collect()
}

fn public_modifiers() -> Modifiers {
    Modifiers { public: true, protected: false, is_static: false, abstract_: false, final_: false, native: false }
}

fn install_well_known_class(decls: &mut DeclTable, trie: &mut PackageTrie, name: &str, super_class: Option<DeclId>) -> DeclId {
    let span = joos_parser::Span::synthetic(joos_parser::FileId(u32::MAX));
    let id = decls.insert(
        NodeId(u32::MAX),
        Decl::Class(ClassInfo {
            node: NodeId(u32::MAX),
            simple_name: name.to_string(),
            fully_qualified_name: format!("java.lang.{name}"),
            modifiers: public_modifiers(),
            super_class,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            span,
        }),
    );
    let _ = trie.insert(&["java".into(), "lang".into(), name.to_string()], id, span);
    id
}

fn install_well_known_interface(decls: &mut DeclTable, trie: &mut PackageTrie, name: &str) -> DeclId {
    let span = joos_parser::Span::synthetic(joos_parser::FileId(u32::MAX));
    let id = decls.insert(
        NodeId(u32::MAX),
        Decl::Interface(InterfaceInfo {
            node: NodeId(u32::MAX),
            simple_name: name.to_string(),
            fully_qualified_name: format!("java.lang.{name}"),
            modifiers: public_modifiers(),
            extends: Vec::new(),
            methods: Vec::new(),
            span,
        }),
    );
    let _ = trie.insert(&["java".into(), "lang".into(), name.to_string()], id, span);
    id
}

/// A method of `java.lang.Object` itself, given a real signature so the
/// hierarchy checker's override rules (spec §4.3, including the "implicit
/// final method inherited into an interface from `java.lang.Object`" case)
/// have something to check against instead of an always-empty method set.
fn object_method(owner: DeclId, node: NodeId, name: &str, params: Vec<(&str, Type)>, return_type: Type, modifiers: Modifiers) -> MethodInfo {
    let span = joos_parser::Span::synthetic(joos_parser::FileId(u32::MAX));
    MethodInfo {
        node,
        owner,
        name: name.to_string(),
        modifiers,
        is_constructor: false,
        params: params.into_iter().map(|(name, ty)| ParamInfo { node: NodeId(u32::MAX), name: name.to_string(), ty }).collect(),
        return_type,
        has_body: true,
        color: None,
        span,
    }
}

fn install_well_known(decls: &mut DeclTable, trie: &mut PackageTrie) -> WellKnown {
    let object = install_well_known_class(decls, trie, "Object", None);
    let string = install_well_known_class(decls, trie, "String", Some(object));
    let cloneable = install_well_known_interface(decls, trie, "Cloneable");
    let serializable = install_well_known_interface(decls, trie, "Serializable");
    let integer = install_well_known_class(decls, trie, "Integer", Some(object));
    let character = install_well_known_class(decls, trie, "Character", Some(object));
    let boolean = install_well_known_class(decls, trie, "Boolean", Some(object));
    let array = install_well_known_class(decls, trie, "Array", Some(object));
    let arrays = install_well_known_class(decls, trie, "Arrays", Some(object));

    // The conventional `length` pseudo-field, synthesized as a final int
    // field of the synthetic Array declaration (spec §4.2).
    if let Decl::Class(info) = decls.get_mut(array) {
        info.fields.push(FieldInfo {
            node: NodeId(u32::MAX),
            name: "length".to_string(),
            modifiers: Modifiers { public: true, protected: false, is_static: false, abstract_: false, final_: true, native: false },
            ty: Type::Primitive(Primitive::Int),
            order: 0,
            span: joos_parser::Span::synthetic(joos_parser::FileId(u32::MAX)),
        });
    }

    // `java.lang.Object`'s real method set (spec §3 "an interface's implicit
    // members", §4.3 override rules): non-final `equals`/`hashCode`/
    // `toString`, plus `getClass`, the one method real `java.lang.Object`
    // marks `final` — giving the hierarchy checker's "cannot override a
    // final method inherited from Object" rule an actual final method to
    // enforce instead of vacuously never firing.
    if let Decl::Class(info) = decls.get_mut(object) {
        let non_final = public_modifiers();
        let final_native = Modifiers { final_: true, native: true, ..public_modifiers() };
        info.methods = vec![
            object_method(object, NodeId(u32::MAX - 1), "equals", vec![("obj", Type::Reference(object))], Type::Primitive(Primitive::Boolean), non_final),
            object_method(object, NodeId(u32::MAX - 2), "hashCode", vec![], Type::Primitive(Primitive::Int), non_final),
            object_method(object, NodeId(u32::MAX - 3), "toString", vec![], Type::String, non_final),
            object_method(object, NodeId(u32::MAX - 4), "getClass", vec![], Type::Reference(object), final_native),
        ];
    }

    WellKnown { object, string, cloneable, serializable, integer, character, boolean, array, arrays }
}

fn insert_skeleton(
    decls: &mut DeclTable,
    trie: &mut PackageTrie,
    package: &[String],
    unit: &CompilationUnit,
    errors: &mut Vec<LinkError>,
) -> (NodeId, DeclId) {
    let object = decls.well_known().object;
    let (node, decl) = match &unit.type_decl {
        TypeDecl::Class(c) => (
            c.id,
            Decl::Class(ClassInfo {
                node: c.id,
                simple_name: c.name.name.clone(),
                fully_qualified_name: qualify(package, &c.name.name),
                modifiers: c.modifiers,
                super_class: if c.name.name == "Object" { None } else { Some(object) },
                interfaces: Vec::new(),
                fields: c
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(i, f)| FieldInfo { node: f.id, name: f.name.name.clone(), modifiers: f.modifiers, ty: Type::Void, order: i, span: f.span })
                    .collect(),
                constructors: c.constructors.iter().map(skeleton_method).collect(),
                methods: c.methods.iter().map(skeleton_method).collect(),
                span: c.span,
            }),
        ),
        TypeDecl::Interface(i) => (
            i.id,
            Decl::Interface(InterfaceInfo {
                node: i.id,
                simple_name: i.name.name.clone(),
                fully_qualified_name: qualify(package, &i.name.name),
                modifiers: i.modifiers,
                extends: Vec::new(),
                methods: i.methods.iter().map(skeleton_method).collect(),
                span: i.span,
            }),
        ),
    };
    let id = decls.insert(node, decl);
    let mut path = package.to_vec();
    path.push(match &unit.type_decl {
        TypeDecl::Class(c) => c.name.name.clone(),
        TypeDecl::Interface(i) => i.name.name.clone(),
    });
    let span = match &unit.type_decl {
        TypeDecl::Class(c) => c.span,
        TypeDecl::Interface(i) => i.span,
    };
    if let Err(e) = trie.insert(&path, id, span) {
        errors.push(e);
    }

    // Fix up owner ids now that we know this declaration's own id.
    if let Decl::Class(info) = decls.get_mut(id) {
        for m in info.constructors.iter_mut().chain(info.methods.iter_mut()) {
            m.owner = id;
        }
    }
    if let Decl::Interface(info) = decls.get_mut(id) {
        for m in info.methods.iter_mut() {
            m.owner = id;
        }
    }
    (node, id)
}

fn skeleton_method(m: &MethodDecl) -> MethodInfo {
    MethodInfo {
        node: m.id,
        owner: DeclId(0),
        name: m.name.name.clone(),
        modifiers: m.modifiers,
        is_constructor: m.is_constructor,
        params: m.params.iter().map(|p| ParamInfo { node: p.id, name: p.name.name.clone(), ty: Type::Void }).collect(),
        return_type: Type::Void,
        has_body: m.body.is_some(),
        color: None,
        span: m.span,
    }
}

fn qualify(package: &[String], name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package.join("."), name)
    }
}

fn build_import_context(
    unit: &CompilationUnit,
    package: &[String],
    top_level: DeclId,
    decls: &DeclTable,
    trie: &PackageTrie,
    errors: &mut Vec<LinkError>,
) -> ImportContext {
    let mut ctx = ImportContext::new();

    // Step 1: same-package declarations, plus the unit's own top-level type.
    for (name, id) in trie.children_decls(package) {
        ctx.bind_direct(&name, id);
    }
    ctx.bind_direct(decls.get(top_level).simple_name(), top_level);

    // Step 2: single-type imports.
    for import in &unit.imports {
        if import.on_demand {
            continue;
        }
        let path = names(&import.path);
        match trie.lookup(&path) {
            Lookup::Decl(id) => {
                if let Err(e) = ctx.bind_single_import(path.last().unwrap(), id, import.span) {
                    errors.push(e);
                }
            }
            _ => errors.push(LinkError::UnresolvedType { name: path.join("."), span: import.span }),
        }
    }

    // Step 3: on-demand imports, `java.lang.*` implicitly included.
    let java_lang = vec!["java".to_string(), "lang".to_string()];
    ctx.bind_on_demand(&trie.children_decls(&java_lang));
    for import in &unit.imports {
        if !import.on_demand {
            continue;
        }
        let path = names(&import.path);
        ctx.bind_on_demand(&trie.children_decls(&path));
    }

    ctx
}

pub(crate) fn resolve_type_name(
    segments: &[String],
    ctx: &ImportContext,
    trie: &PackageTrie,
    span: joos_parser::Span,
) -> Result<DeclId, LinkError> {
    if segments.len() == 1 {
        match ctx.resolve(&segments[0]) {
            Some(Binding::Decl(id)) => return Ok(id),
            Some(Binding::Ambiguous) => {
                return Err(LinkError::AmbiguousImport { name: segments[0].clone(), span })
            }
            Some(Binding::Package) | None => {}
        }
    }
    match trie.lookup(segments) {
        Lookup::Decl(id) => Ok(id),
        _ => Err(LinkError::UnresolvedType { name: segments.join("."), span }),
    }
}

pub(crate) fn resolve_type_ref(ty: &TypeRef, ctx: &ImportContext, trie: &PackageTrie, decls: &DeclTable) -> Result<Type, LinkError> {
    match ty {
        TypeRef::Primitive(p, _) => Ok(Type::Primitive(match p {
            PrimitiveTypeName::Boolean => Primitive::Boolean,
            PrimitiveTypeName::Byte => Primitive::Byte,
            PrimitiveTypeName::Short => Primitive::Short,
            PrimitiveTypeName::Int => Primitive::Int,
            PrimitiveTypeName::Char => Primitive::Char,
        })),
        TypeRef::Void(_) => Ok(Type::Void),
        TypeRef::Named(name) => {
            let segments = names(&name.segments);
            let id = resolve_type_name(&segments, ctx, trie, name.span)?;
            if decls.get(id).fully_qualified_name() == "java.lang.String" {
                Ok(Type::String)
            } else {
                Ok(Type::Reference(id))
            }
        }
        TypeRef::Array(elem, _) => Ok(Type::Array(Box::new(resolve_type_ref(elem, ctx, trie, decls)?))),
    }
}

fn resolve_unit(unit: &CompilationUnit, ctx: &ImportContext, decls: &mut DeclTable, trie: &PackageTrie, errors: &mut Vec<LinkError>) {
    let node = match &unit.type_decl {
        TypeDecl::Class(c) => c.id,
        TypeDecl::Interface(i) => i.id,
    };
    let Some(id) = decls.id_of_node(node) else { return };

    match &unit.type_decl {
        TypeDecl::Class(c) => resolve_class(c, id, ctx, trie, decls, errors),
        TypeDecl::Interface(i) => resolve_interface(i, id, ctx, trie, decls, errors),
    }
}

fn resolve_class(c: &ClassDecl, id: DeclId, ctx: &ImportContext, trie: &PackageTrie, decls: &mut DeclTable, errors: &mut Vec<LinkError>) {
    let mut super_class = if c.name.name == "Object" { None } else { Some(decls.well_known().object) };
    if let Some(sup) = &c.super_class {
        let segments = names(&sup.segments);
        match resolve_type_name(&segments, ctx, trie, sup.span) {
            Ok(sid) => super_class = Some(sid),
            Err(e) => errors.push(e),
        }
    }

    let mut interfaces = Vec::new();
    for iface in &c.interfaces {
        let segments = names(&iface.segments);
        match resolve_type_name(&segments, ctx, trie, iface.span) {
            Ok(iid) => interfaces.push(iid),
            Err(e) => errors.push(e),
        }
    }

    let mut fields = Vec::new();
    for (i, f) in c.fields.iter().enumerate() {
        let ty = resolve_type_ref(&f.ty, ctx, trie, decls).unwrap_or_else(|e| {
            errors.push(e);
            Type::Void
        });
        fields.push(FieldInfo { node: f.id, name: f.name.name.clone(), modifiers: f.modifiers, ty, order: i, span: f.span });
    }

    let constructors = c.constructors.iter().map(|m| resolve_method(m, id, ctx, trie, decls, errors)).collect();
    let methods = c.methods.iter().map(|m| resolve_method(m, id, ctx, trie, decls, errors)).collect();

    if let Decl::Class(info) = decls.get_mut(id) {
        info.super_class = super_class;
        info.interfaces = interfaces;
        info.fields = fields;
        info.constructors = constructors;
        info.methods = methods;
    }
}

fn resolve_interface(i: &InterfaceDecl, id: DeclId, ctx: &ImportContext, trie: &PackageTrie, decls: &mut DeclTable, errors: &mut Vec<LinkError>) {
    let mut extends = Vec::new();
    for ext in &i.extends {
        let segments = names(&ext.segments);
        match resolve_type_name(&segments, ctx, trie, ext.span) {
            Ok(eid) => extends.push(eid),
            Err(e) => errors.push(e),
        }
    }
    let methods = i.methods.iter().map(|m| resolve_method(m, id, ctx, trie, decls, errors)).collect();
    if let Decl::Interface(info) = decls.get_mut(id) {
        info.extends = extends;
        info.methods = methods;
    }
}

fn resolve_method(m: &MethodDecl, owner: DeclId, ctx: &ImportContext, trie: &PackageTrie, decls: &DeclTable, errors: &mut Vec<LinkError>) -> MethodInfo {
    let params = m
        .params
        .iter()
        .map(|p| {
            let ty = resolve_type_ref(&p.ty, ctx, trie, decls).unwrap_or_else(|e| {
                errors.push(e);
                Type::Void
            });
            ParamInfo { node: p.id, name: p.name.name.clone(), ty }
        })
        .collect();
    let return_type = match &m.return_type {
        Some(rt) => resolve_type_ref(rt, ctx, trie, decls).unwrap_or_else(|e| {
            errors.push(e);
            Type::Void
        }),
        None => Type::Void,
    };
    MethodInfo {
        node: m.id,
        owner,
        name: m.name.name.clone(),
        modifiers: m.modifiers,
        is_constructor: m.is_constructor,
        params,
        return_type,
        has_body: m.body.is_some(),
        color: None,
        span: m.span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joos_parser::{parse_file, FileId};

    fn unit(id: u32, src: &str) -> CompilationUnit {
        parse_file(FileId(id), src).expect("parse")
    }

    #[test]
    fn links_simple_class_with_implicit_object_superclass() {
        let units = vec![unit(0, "public class A { public A() {} }")];
        let program = link(&units).expect("link");
        let id = program.units[0].top_level;
        let Decl::Class(info) = program.decls.get(id) else { panic!("expected class") };
        assert_eq!(info.simple_name, "A");
        assert_eq!(info.super_class, Some(program.decls.well_known().object));
    }

    #[test]
    fn links_extends_across_files() {
        let units = vec![
            unit(0, "public class A { public A() {} }"),
            unit(1, "public class B extends A { public B() {} }"),
        ];
        let program = link(&units).expect("link");
        let b_id = program.units[1].top_level;
        let a_id = program.units[0].top_level;
        let Decl::Class(info) = program.decls.get(b_id) else { panic!("expected class") };
        assert_eq!(info.super_class, Some(a_id));
    }

    #[test]
    fn unresolved_super_class_is_a_link_error() {
        let units = vec![unit(0, "public class A extends Ghost { public A() {} }")];
        let errors = link(&units).expect_err("expected link error");
        assert!(errors.iter().any(|e| matches!(e, LinkError::UnresolvedType { .. })));
    }

    #[test]
    fn field_type_resolves_to_int() {
        let units = vec![unit(0, "public class A { public A() {} public int x; }")];
        let program = link(&units).expect("link");
        let id = program.units[0].top_level;
        let Decl::Class(info) = program.decls.get(id) else { panic!("expected class") };
        assert_eq!(info.fields[0].ty, Type::Primitive(Primitive::Int));
    }
}
