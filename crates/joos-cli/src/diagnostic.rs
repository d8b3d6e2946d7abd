//! Diagnostics this driver raises itself, before `joos-checker` ever runs:
//! a bad file extension, non-ASCII source bytes the lexer already rejects
//! one file late, an unreadable path, or a top-level type name that doesn't
//! match its file's stem. Spec scopes all of these to the driver, not the
//! core compiler, so they get their own small error type here instead of
//! living in `joos-checker::error`.
//!
//! Rendered through `joos_checker::diagnostic::Diagnostic` — the same
//! builder every checker-phase error goes through — so a parse error, a
//! filename mismatch, and a hierarchy error all come out of this binary
//! looking like one consistent diagnostic stream.

use joos_checker::diagnostic::{Diagnostic, ErrorCode};
use joos_parser::{ParseError, SourceManager, Span};
use std::path::Path;

#[derive(Debug)]
pub enum CliError {
    /// An input path did not end in `.java`.
    BadExtension { path: String },
    /// An input file could not be opened or read as UTF-8.
    Unreadable { path: String, message: String },
    /// The top-level type's name did not match the file's stem.
    NameMismatch { found: String, expected: String, span: Span },
}

impl CliError {
    pub fn to_diagnostic(&self, files: &SourceManager) -> Diagnostic {
        match self {
            CliError::BadExtension { path } => {
                Diagnostic::error(format!("input file '{}' does not have a '.java' extension", path))
                    .with_code(ErrorCode("E0001"))
            }
            CliError::Unreadable { path, message } => {
                Diagnostic::error(format!("could not read '{}': {}", path, message)).with_code(ErrorCode("E0002"))
            }
            CliError::NameMismatch { found, expected, span } => Diagnostic::error(format!(
                "top-level type '{}' does not match file name '{}'",
                found, expected
            ))
            .with_code(ErrorCode("E0003"))
            .with_primary_label(files, *span, "declared here"),
        }
    }
}

pub fn from_parse_errors(errors: &[ParseError], files: &SourceManager) -> Vec<Diagnostic> {
    errors.iter().map(|e| from_parse_error(e, files)).collect()
}

fn from_parse_error(error: &ParseError, files: &SourceManager) -> Diagnostic {
    use ParseError::*;
    let code = ErrorCode("E0100");
    match error {
        UnexpectedToken { expected, found, span } => {
            Diagnostic::error(format!("expected {} but found {}", expected, found))
                .with_code(code)
                .with_primary_label(files, *span, "unexpected token")
        }
        ExpectedExpression { span } => {
            Diagnostic::error("expected an expression").with_code(code).with_primary_label(files, *span, "expected an expression here")
        }
        ExpectedType { span } => {
            Diagnostic::error("expected a type").with_code(code).with_primary_label(files, *span, "expected a type here")
        }
        ExpectedStatement { span } => {
            Diagnostic::error("expected a statement").with_code(code).with_primary_label(files, *span, "expected a statement here")
        }
        NoTopLevelType { span } => Diagnostic::error("a file must declare exactly one top-level class or interface")
            .with_code(code)
            .with_primary_label(files, *span, "no top-level type found"),
        MalformedArrayType { span } => {
            Diagnostic::error("array type brackets must immediately follow the element type or name")
                .with_code(code)
                .with_primary_label(files, *span, "misplaced array brackets")
        }
    }
}

/// The file stem a top-level type's simple name must match, per the
/// external filename/classname-matching rule.
pub fn expected_type_name(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}
