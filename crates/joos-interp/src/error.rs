//! Interpreter errors.
//!
//! Grounded on `raya-core`'s `VmError` shape (one variant per diagnosable
//! runtime condition), trimmed to what a tree-IR walker over an
//! already-checked, already-lowered program can actually hit: user-program
//! bugs were ruled out by `joos-checker` before lowering ever ran, so every
//! variant here is either an invariant violation in the pipeline feeding
//! this crate, or the target program's own explicit `__exception` trap.

use joos_compiler::ir::Label;

pub type InterpResult<T> = Result<T, InterpError>;

#[derive(Debug, thiserror::Error)]
pub enum InterpError {
    /// The target program ran `__exception` (spec §6: "aborts with status
    /// 13") — not an interpreter bug, the modeled runtime's own trap.
    #[error("program trapped via __exception")]
    Trapped,

    /// The target program ran `__debexit(code)`; carries the caller's exit
    /// code up through every frame to `run_program`'s caller.
    #[error("program exited via __debexit({0})")]
    Exited(i32),

    /// A `Call`/`CJump`/`Jump` referenced a label with no matching method
    /// body, dispatch-vector slot, or native handler.
    #[error("no method, native, or jump target for label {0}")]
    UnknownLabel(Label),

    /// A `Name` read a temporary never bound in the current frame —
    /// `joos-compiler`'s lowering is supposed to bind every temp before its
    /// first use.
    #[error("unbound temporary in current frame")]
    UnboundTemp,

    /// A heap or static-data access fell outside the bounds the
    /// append-only allocator has handed out so far.
    #[error("out-of-bounds memory access at address {0}")]
    OutOfBounds(i32),
}
