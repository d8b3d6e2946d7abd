//! Declaration arena.
//!
//! The type linker turns every class/interface AST node into a `ClassInfo`
//! or `InterfaceInfo` stored here, keyed by a `DeclId`. Everything
//! downstream (hierarchy checker, resolver, CFG builder, and later
//! `joos-compiler`) reads declarations only through this table rather than
//! walking back into the AST, matching spec §9's "arena + index" ownership
//! model: cross-references are dense integer ids interpreted against the
//! owning arena.

use joos_parser::ast::{Modifiers, NodeId};
use joos_parser::Span;
use joos_types::{DeclId, Signature, Type};
use rustc_hash::FxHashMap;

/// A resolved field: the declared type is filled in by the type linker, not
/// known at parse time.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub node: NodeId,
    pub name: String,
    pub modifiers: Modifiers,
    pub ty: Type,
    /// Declaration order within the class, used by the object-layout pass
    /// and by the forward-reference rule (`g.position < f.position`).
    pub order: usize,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub node: NodeId,
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub node: NodeId,
    pub owner: DeclId,
    pub name: String,
    pub modifiers: Modifiers,
    pub is_constructor: bool,
    pub params: Vec<ParamInfo>,
    pub return_type: Type,
    pub has_body: bool,
    /// Assigned by the dispatch-vector builder (`joos-compiler`); `None`
    /// until then and always `None` for static methods and constructors.
    pub color: Option<u32>,
    pub span: Span,
}

impl MethodInfo {
    pub fn signature(&self) -> Signature {
        Signature {
            name: self.name.clone(),
            params: self.params.iter().map(|p| p.ty.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub node: NodeId,
    pub simple_name: String,
    pub fully_qualified_name: String,
    pub modifiers: Modifiers,
    /// `None` only for `java.lang.Object` itself.
    pub super_class: Option<DeclId>,
    pub interfaces: Vec<DeclId>,
    pub fields: Vec<FieldInfo>,
    pub constructors: Vec<MethodInfo>,
    pub methods: Vec<MethodInfo>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    pub node: NodeId,
    pub simple_name: String,
    pub fully_qualified_name: String,
    pub modifiers: Modifiers,
    pub extends: Vec<DeclId>,
    pub methods: Vec<MethodInfo>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Class(ClassInfo),
    Interface(InterfaceInfo),
}

impl Decl {
    pub fn simple_name(&self) -> &str {
        match self {
            Decl::Class(c) => &c.simple_name,
            Decl::Interface(i) => &i.simple_name,
        }
    }

    pub fn fully_qualified_name(&self) -> &str {
        match self {
            Decl::Class(c) => &c.fully_qualified_name,
            Decl::Interface(i) => &i.fully_qualified_name,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Decl::Class(c) => c.modifiers,
            Decl::Interface(i) => i.modifiers,
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, Decl::Interface(_))
    }

    pub fn methods(&self) -> &[MethodInfo] {
        match self {
            Decl::Class(c) => &c.methods,
            Decl::Interface(i) => &i.methods,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Decl::Class(c) => c.span,
            Decl::Interface(i) => i.span,
        }
    }
}

/// Well-known `java.lang` declarations, populated before user code is
/// linked (spec §3 "Package trie").
#[derive(Debug, Clone, Copy)]
pub struct WellKnown {
    pub object: DeclId,
    pub string: DeclId,
    pub cloneable: DeclId,
    pub serializable: DeclId,
    pub integer: DeclId,
    pub character: DeclId,
    pub boolean: DeclId,
    pub array: DeclId,
    pub arrays: DeclId,
}

/// The arena of every class/interface declaration in the program, plus the
/// well-known `java.lang` ids needed by assignability/cast checks and by
/// array `.length` synthesis.
#[derive(Debug, Default)]
pub struct DeclTable {
    decls: Vec<Decl>,
    by_node: FxHashMap<NodeId, DeclId>,
    well_known: Option<WellKnown>,
}

impl DeclTable {
    pub fn new() -> Self {
        DeclTable::default()
    }

    pub fn insert(&mut self, node: NodeId, decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.by_node.insert(node, id);
        self.decls.push(decl);
        id
    }

    pub fn get(&self, id: DeclId) -> &Decl {
        &self.decls[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.0 as usize]
    }

    pub fn id_of_node(&self, node: NodeId) -> Option<DeclId> {
        self.by_node.get(&node).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.decls.len() as u32).map(DeclId)
    }

    pub fn set_well_known(&mut self, wk: WellKnown) {
        self.well_known = Some(wk);
    }

    pub fn well_known(&self) -> WellKnown {
        self.well_known
            .expect("internal compiler error: well-known java.lang declarations not populated")
    }
}
