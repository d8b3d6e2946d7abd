//! Joos type system
//!
//! Type representation and the two predicates static semantics checking
//! runs on them: assignability and cast validity. This crate knows nothing
//! about declarations themselves — it asks a [`Hierarchy`] implementation
//! (owned by `joos-checker`) whenever it needs to know whether one class
//! extends another.

#![warn(missing_docs)]

pub mod error;
pub mod subtyping;
pub mod ty;

pub use error::TypeError;
pub use subtyping::{is_assignable_to, is_valid_cast, Hierarchy};
pub use ty::{DeclId, Primitive, Resolved, Signature, Type};
