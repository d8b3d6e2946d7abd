//! Code generation: tree IR → x86-32 assembly text (spec §4.8-§4.10).
//!
//! ```text
//! canonicalized TIR -> tile (maximal munch) -> virtual asm (Temps)
//!                    -> linear-scan regalloc -> physical asm -> text
//! ```
//!
//! Three stages, one module each, mirroring the spec's own three-stage
//! split rather than the teacher's single `IrCodeGenerator` (which target a
//! bytecode VM and had no tiling/allocation phases at all — see `tile.rs`'s
//! doc comment for what carries over from it regardless).

pub mod asm;
pub mod regalloc;
pub mod tile;

use crate::error::CompileResult;
use crate::lower::LoweredProgram;

/// Runs the full tile-select → allocate → emit pipeline over every lowered
/// method and static initializer, producing one assembly-text unit.
pub fn generate(program: &LoweredProgram) -> CompileResult<String> {
    asm::emit_program(program)
}
