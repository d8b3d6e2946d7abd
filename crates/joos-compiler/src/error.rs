//! Compilation errors.
//!
//! Spec §7: a user error is caught entirely by `joos-checker` before this
//! crate ever runs (`check()` returns `Err` and stops the pipeline first), so
//! every error this crate can raise is, by construction, an internal one —
//! this enum only ever maps to the exit-code-1 "internal error" case, never
//! to 42. Trimmed from the teacher's `raya_compiler::error::CompileError`
//! (which mixed user-facing bytecode-verification errors in with internal
//! ones) down to the handful of "this should be unreachable" cases TIR
//! lowering and code generation can still hit if an earlier pass's invariant
//! was violated.

use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    /// A `Name` node reached lowering with no entry in `Resolutions` —
    /// `joos-checker::resolve` is supposed to classify every one.
    #[error("internal compiler error: unresolved name at {0:?}")]
    UnresolvedName(joos_parser::Span),

    /// A method call resolved to a declaration this crate's own overload
    /// search (duplicated from `joos-checker::resolve`, since the original is
    /// `pub(crate)` there) could not find again.
    #[error("internal compiler error: no matching method for call at {0:?}")]
    NoMatchingMethod(joos_parser::Span),

    /// A field access resolved to a declaration this crate's own field
    /// lookup could not find again.
    #[error("internal compiler error: no matching field for access at {0:?}")]
    NoMatchingField(joos_parser::Span),

    /// The register allocator could not satisfy a pinned interval (spec
    /// §4.9's `IMUL`/`IDIV` pins) even after evicting every evictable one.
    #[error("internal compiler error: register allocation failed for a pinned temporary")]
    AllocationFailed,

    /// A method or constructor body has no explicit label/frame assigned by
    /// the mangler before code generation tried to reference it.
    #[error("internal compiler error: missing assembly label for a declaration")]
    MissingLabel,
}
