//! Ahead-of-time compiler backend: lowers a `joos-checker`-checked program
//! to x86-32 assembly text (spec §2's "TIR builder" through "x86-32 assembly
//! emission" stages).
//!
//! ```text
//! CheckedProgram -> lower_program (AST -> tree IR, spec §4.6/§4.7)
//!                 -> codegen::generate (tile -> regalloc -> emit, spec §4.8-§4.10)
//! ```

pub mod canon;
pub mod codegen;
pub mod error;
pub mod ir;
pub mod layout;
pub mod lower;
pub mod mangle;

pub use error::{CompileError, CompileResult};
pub use lower::LoweredProgram;

use joos_checker::CheckedProgram;
use joos_parser::ast::CompilationUnit;

/// The result of a successful compile: x86-32 assembly text, plus whatever
/// dead-assignment warnings `joos-checker` recorded (spec §7 — warnings
/// never affect the exit code, so `joos-cli` only needs to print these).
pub struct CompiledProgram {
    pub assembly: String,
    pub warnings: Vec<joos_checker::DeadAssignment>,
}

/// Runs the full backend over an already-checked program. `units` must be
/// the same compilation units `checked` was produced from.
pub fn compile(units: &[CompilationUnit], mut checked: CheckedProgram) -> CompileResult<CompiledProgram> {
    let lowered = lower::lower_program(&mut checked.program, &checked.resolutions, units, checked.entry_point)?;
    let assembly = codegen::generate(&lowered)?;
    Ok(CompiledProgram { assembly, warnings: checked.warnings })
}
