//! The Joos abstract syntax tree.
//!
//! Per spec §3, node shapes are immutable once built: parent nodes own their
//! children by value. Cross-references produced by later passes (resolved
//! types, resolved declarations, CFG edges) are never stored *in* the node —
//! they live in side tables keyed by [`NodeId`], mirroring the
//! `expr_types: FxHashMap<usize, TypeId>` side table the teacher's
//! `raya_checker::checker::TypeChecker` keeps instead of mutating AST nodes
//! in place. This gives every later pass a "mutable resolution slot" without
//! any node needing interior mutability.

mod decl;
mod expression;
mod statement;
mod types;
pub mod visitor;

pub use decl::*;
pub use expression::*;
pub use statement::*;
pub use types::*;

use crate::span::Span;
use std::sync::atomic::{AtomicU32, Ordering};

/// Stable identity for an AST node, used to key side tables produced by
/// later passes (resolved types, resolved declarations, liveness sets, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Allocates fresh, globally unique [`NodeId`]s. One instance is shared by a
/// single parse; ids are never reused, so they remain valid keys into side
/// tables built by every later pass over the same AST.
#[derive(Debug, Default)]
pub struct NodeIdGen(AtomicU32);

impl NodeIdGen {
    pub fn new() -> Self {
        NodeIdGen(AtomicU32::new(0))
    }

    pub fn next(&self) -> NodeId {
        NodeId(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

/// A dotted identifier (`a`, or `a.b.c`), kept as written until the name
/// disambiguator (spec §4.4) classifies it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// The modifier set, §3: a closed set `{public, protected, static, abstract,
/// final, native}`, with required/forbidden combinations enforced at
/// construction time by the weeder (see `joos-checker::weeder`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub public: bool,
    pub protected: bool,
    pub is_static: bool,
    pub abstract_: bool,
    pub final_: bool,
    pub native: bool,
}

impl Modifiers {
    pub fn is_visible_outside_package(&self) -> bool {
        self.public
    }
}
