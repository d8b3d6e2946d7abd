//! Declaration AST nodes: compilation unit, package, import, class,
//! interface, field, method, parameter — spec §3 "Declarations".

use super::{Block, Ident, Modifiers, NodeId, TypeName, TypeRef};
use crate::span::{FileId, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct PackageDecl {
    pub path: Vec<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// `a.b.C` for a single-type import, `a.b` for `a.b.*`.
    pub path: Vec<Ident>,
    pub on_demand: bool,
    pub span: Span,
}

/// A parameter or local — spec §3 "each a variable declaration with a
/// `param` flag".
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub id: NodeId,
    pub ty: TypeRef,
    pub name: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub id: NodeId,
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub name: Ident,
    pub initializer: Option<super::Expr>,
    pub span: Span,
}

/// A method or constructor. Spec §3: "signature = (name, ordered
/// parameter-type fingerprint)"; constructors use the enclosing class's
/// simple name as `name`. `body` is `None` for abstract and interface
/// methods and for `native` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub id: NodeId,
    pub modifiers: Modifiers,
    pub is_constructor: bool,
    pub return_type: Option<TypeRef>,
    pub name: Ident,
    pub params: Vec<Param>,
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub id: NodeId,
    pub modifiers: Modifiers,
    pub name: Ident,
    pub super_class: Option<TypeName>,
    pub interfaces: Vec<TypeName>,
    pub fields: Vec<FieldDecl>,
    pub constructors: Vec<MethodDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub id: NodeId,
    pub modifiers: Modifiers,
    pub name: Ident,
    pub extends: Vec<TypeName>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Class(ClassDecl),
    Interface(InterfaceDecl),
}

impl TypeDecl {
    pub fn name(&self) -> &Ident {
        match self {
            TypeDecl::Class(c) => &c.name,
            TypeDecl::Interface(i) => &i.name,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            TypeDecl::Class(c) => c.modifiers,
            TypeDecl::Interface(i) => i.modifiers,
        }
    }
}

/// The top-level "program" node — one per source file (spec §6: one file per
/// compilation unit, a file's top-level type's simple name must equal its
/// file stem).
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub file: FileId,
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub type_decl: TypeDecl,
}
