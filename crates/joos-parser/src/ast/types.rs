//! Syntactic type references, as written in source.
//!
//! These are pure syntax: the type linker (spec §4.2) attaches a resolved
//! declaration in a side table keyed by the [`TypeRef`]'s [`NodeId`], it
//! never mutates the node.

use super::{Ident, NodeId};
use crate::span::Span;

/// A primitive type name, spec §3: `{boolean, byte, short, int, char}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTypeName {
    Boolean,
    Byte,
    Short,
    Int,
    Char,
}

impl PrimitiveTypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveTypeName::Boolean => "boolean",
            PrimitiveTypeName::Byte => "byte",
            PrimitiveTypeName::Short => "short",
            PrimitiveTypeName::Int => "int",
            PrimitiveTypeName::Char => "char",
        }
    }
}

/// A dotted type name as written (`Foo`, `java.util.Foo`), resolved later by
/// the type linker against the import context and package trie.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub id: NodeId,
    pub segments: Vec<Ident>,
    pub span: Span,
}

impl TypeName {
    pub fn simple_name(&self) -> &str {
        &self.segments.last().expect("TypeName has at least one segment").name
    }
}

/// A syntactic type reference: primitive, `void`, a named (class/interface)
/// type, or an array of one of those.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Primitive(PrimitiveTypeName, Span),
    Void(Span),
    Named(TypeName),
    Array(Box<TypeRef>, Span),
}

impl TypeRef {
    pub fn span(&self) -> Span {
        match self {
            TypeRef::Primitive(_, span) => *span,
            TypeRef::Void(span) => *span,
            TypeRef::Named(name) => name.span,
            TypeRef::Array(_, span) => *span,
        }
    }
}
