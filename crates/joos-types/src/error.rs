//! Type system errors

use thiserror::Error;

/// Errors that can occur while linking or checking types.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// A name did not resolve to any visible type declaration.
    #[error("undefined type: {name}")]
    UndefinedType {
        /// The unresolved name, as written in the source.
        name: String,
    },

    /// An expression's static type did not match what the surrounding
    /// context required (assignment, return, condition, operand, ...).
    #[error("type mismatch: expected {expected}, got {actual}")]
    Mismatch {
        /// Expected type, rendered for diagnostics.
        expected: String,
        /// Actual type, rendered for diagnostics.
        actual: String,
    },

    /// A cast that `isValidCast` rejects.
    #[error("invalid cast from {from} to {to}")]
    InvalidCast {
        /// Source type of the cast.
        from: String,
        /// Target type of the cast.
        to: String,
    },

    /// Two declarations in a hierarchy chain refer back to each other.
    #[error("circular type hierarchy: {cycle}")]
    CircularHierarchy {
        /// The cycle, rendered as a chain of names.
        cycle: String,
    },
}
