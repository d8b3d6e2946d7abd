//! `joosc` — the ahead-of-time Joos compiler's command-line driver.
//!
//! Everything spec §1's core pipeline explicitly pushes out to an "external
//! collaborator" lives here instead of in `joos-checker`: per-file `.java`
//! extension and filename/classname-matching checks, turning the checker's
//! and compiler's error enums into rendered diagnostics, and the exit-code
//! mapping a shell script actually observes (spec §7: 0 success, 42 any
//! user-program error, 1 internal compiler error).

mod diagnostic;
mod output;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use codespan_reporting::term;
use diagnostic::CliError;
use joos_checker::diagnostic::Diagnostic;
use joos_parser::SourceManager;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_USER_ERROR: u8 = 42;
const EXIT_INTERNAL_ERROR: u8 = 1;

#[derive(Parser)]
#[command(name = "joosc")]
#[command(about = "Ahead-of-time compiler for the Joos language")]
#[command(version)]
struct Cli {
    /// Joos source files to compile, one top-level class or interface each
    #[arg(required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// What to emit: the canonicalized tree IR, or x86-32 assembly
    #[arg(long, value_enum, default_value_t = Emit::Asm)]
    emit: Emit,

    /// Where to write the emitted output (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Diagnostic color handling
    #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
    color: ColorArg,

    /// How to render diagnostics
    #[arg(long = "diagnostics-format", value_enum, default_value_t = DiagnosticsFormat::Pretty)]
    diagnostics_format: DiagnosticsFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tir,
    Asm,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl ColorArg {
    fn as_flag(self) -> &'static str {
        match self {
            ColorArg::Auto => "auto",
            ColorArg::Always => "always",
            ColorArg::Never => "never",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DiagnosticsFormat {
    Pretty,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(UserFacing::ExitCode(code)) => ExitCode::from(code),
        Err(UserFacing::Unexpected(e)) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_INTERNAL_ERROR)
        }
    }
}

/// Anything that sends this process out with a non-zero status: either spec
/// §7's explicit 42/1 mapping, or a genuinely unanticipated failure (e.g. an
/// I/O error writing the output file) that has no spec-assigned exit code of
/// its own and is reported through `anyhow` instead, matching `raya-cli`'s
/// own `main() -> anyhow::Result<()>` top-level plumbing.
enum UserFacing {
    ExitCode(u8),
    Unexpected(anyhow::Error),
}

impl From<anyhow::Error> for UserFacing {
    fn from(e: anyhow::Error) -> Self {
        UserFacing::Unexpected(e)
    }
}

/// Parses, validates, checks, and compiles every input file, returning the
/// exit code a failure should produce (spec §7). Diagnostics are emitted to
/// stderr as a side effect; the emitted TIR/assembly (on success) goes to
/// `cli.output` or stdout.
fn run(cli: &Cli) -> Result<(), UserFacing> {
    let color_choice = output::resolve_color_choice(cli.color.as_flag());

    let mut files = SourceManager::new();
    let mut units = Vec::with_capacity(cli.files.len());
    let mut cli_errors = Vec::new();
    let mut parse_errors: Vec<joos_parser::ParseError> = Vec::new();

    for path in &cli.files {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            cli_errors.push(CliError::BadExtension { path: path.display().to_string() });
            continue;
        };
        if extension != "java" {
            cli_errors.push(CliError::BadExtension { path: path.display().to_string() });
            continue;
        }
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                cli_errors.push(CliError::Unreadable { path: path.display().to_string(), message: e.to_string() });
                continue;
            }
        };
        let file_id = files.add_file(path.display().to_string(), source.clone());

        match joos_parser::parse_file(file_id, &source) {
            Ok(unit) => {
                if let Some(expected) = diagnostic::expected_type_name(path) {
                    let decl_name = unit.type_decl.name();
                    if decl_name.name != expected {
                        cli_errors.push(CliError::NameMismatch {
                            found: decl_name.name.clone(),
                            expected,
                            span: decl_name.span,
                        });
                    }
                }
                units.push(unit);
            }
            Err(errors) => parse_errors.extend(errors),
        }
    }

    if !cli_errors.is_empty() || !parse_errors.is_empty() {
        let mut diagnostics: Vec<Diagnostic> = cli_errors.iter().map(|e| e.to_diagnostic(&files)).collect();
        diagnostics.extend(diagnostic::from_parse_errors(&parse_errors, &files));
        emit_diagnostics(&diagnostics, &files, cli.diagnostics_format, color_choice);
        return Err(UserFacing::ExitCode(EXIT_USER_ERROR));
    }

    let mut checked = match joos_checker::check(&units) {
        Ok(checked) => checked,
        Err(errors) => {
            let diagnostics = joos_checker::diagnostic::from_check_errors(&errors, &files);
            emit_diagnostics(&diagnostics, &files, cli.diagnostics_format, color_choice);
            return Err(UserFacing::ExitCode(EXIT_USER_ERROR));
        }
    };

    let warnings: Vec<Diagnostic> = checked.warnings.iter().map(|w| Diagnostic::from_dead_assignment(w, &files)).collect();
    emit_diagnostics(&warnings, &files, cli.diagnostics_format, color_choice);

    let lowered = match joos_compiler::lower::lower_program(&mut checked.program, &checked.resolutions, &units, checked.entry_point) {
        Ok(lowered) => lowered,
        Err(e) => {
            eprintln!("internal compiler error: {e}");
            return Err(UserFacing::ExitCode(EXIT_INTERNAL_ERROR));
        }
    };

    let text = match cli.emit {
        Emit::Tir => render_tir(&lowered),
        Emit::Asm => match joos_compiler::codegen::generate(&lowered) {
            Ok(assembly) => assembly,
            Err(e) => {
                eprintln!("internal compiler error: {e}");
                return Err(UserFacing::ExitCode(EXIT_INTERNAL_ERROR));
            }
        },
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("could not write output file '{}'", path.display()))?;
        }
        None => print!("{text}"),
    }

    Ok(())
}

fn emit_diagnostics(diagnostics: &[Diagnostic], files: &SourceManager, format: DiagnosticsFormat, color: termcolor::ColorChoice) {
    if diagnostics.is_empty() {
        return;
    }
    match format {
        DiagnosticsFormat::Pretty => {
            let mut writer = termcolor::StandardStream::stderr(color);
            let config = term::Config::default();
            for diag in diagnostics {
                let _ = term::emit(&mut writer, &config, files, diag.inner());
            }
        }
        DiagnosticsFormat::Json => {
            let rendered: Vec<_> = diagnostics.iter().map(|d| joos_checker::diagnostic::JsonDiagnostic::from_diagnostic(d, files)).collect();
            if let Ok(json) = serde_json::to_string_pretty(&rendered) {
                eprintln!("{json}");
            }
        }
    }
}

/// A plain-text walk of the lowered tree IR (spec §6's testing interface
/// needs no prettier form than this — it's read by a developer checking
/// `joos-interp` output, not parsed back in).
fn render_tir(program: &joos_compiler::LoweredProgram) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    let _ = writeln!(out, "entry: {}", program.entry_label);
    for field in &program.static_fields {
        let _ = writeln!(out, "static {field}");
    }
    for (label, value) in &program.string_literals {
        let _ = writeln!(out, "string {label} = {value:?}");
    }
    let _ = writeln!(out, "static_init:");
    for stmt in &program.static_init {
        let _ = writeln!(out, "  {stmt:?}");
    }
    for class in &program.classes {
        let _ = writeln!(out, "class {} dispatch_vector={:?}", class.label, class.dispatch_vector);
        for method in &class.methods {
            let _ = writeln!(out, "  method {} ({} args)", method.label, method.num_args);
            for stmt in &method.body {
                let _ = writeln!(out, "    {stmt:?}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_java_file_passes_extension_validation() {
        assert_eq!(PathBuf::from("Main.java").extension().and_then(|e| e.to_str()), Some("java"));
    }

    #[test]
    fn expected_type_name_is_the_file_stem() {
        assert_eq!(diagnostic::expected_type_name(&PathBuf::from("Main.java")), Some("Main".to_string()));
    }
}
