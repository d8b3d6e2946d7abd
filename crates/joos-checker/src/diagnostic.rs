//! Diagnostic rendering: turns the per-pass error enums into
//! `codespan-reporting` diagnostics with source snippets, plus a JSON
//! representation for tooling (spec §7's "reported once with source range
//! and phase").

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, Severity};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use joos_parser::{SourceManager, Span};
use serde::{Deserialize, Serialize};

use crate::error::{CfgError, DeadAssignment, HierarchyError, LinkError, ResolveError, WeedError};
use crate::CheckErrors;

/// Error or warning code, e.g. `"E2001"` or `"W0001"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A diagnostic message with source code context.
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic { inner: CsDiagnostic::new(severity).with_message(message), code: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code.clone());
        self.inner = self.inner.with_code(code.0);
        self
    }

    /// Add a primary label at `span`, resolving it to a byte range against
    /// `files`.
    pub fn with_primary_label(mut self, files: &SourceManager, span: Span, message: impl Into<String>) -> Self {
        let (file_id, range) = span_range(files, span);
        let label = Label::primary(file_id, range).with_message(message);
        self.inner.labels.push(label);
        self
    }

    pub fn with_secondary_label(mut self, files: &SourceManager, span: Span, message: impl Into<String>) -> Self {
        let (file_id, range) = span_range(files, span);
        let label = Label::secondary(file_id, range).with_message(message);
        self.inner.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Emit the diagnostic to stderr with colors.
    pub fn emit(&self, files: &SourceManager) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        let config = term::Config::default();
        term::emit(&mut writer, &config, files, &self.inner)
    }

    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Convert to JSON for IDE/tooling consumption.
    pub fn to_json(&self, files: &SourceManager) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from_diagnostic(self, files))
    }
}

/// Resolve a line/column [`Span`] to a `(file_id, byte_range)` pair against
/// `files`, clamping each endpoint to its line's byte range (spans never
/// carry byte offsets directly — only line/col, per spec §3).
fn span_range(files: &SourceManager, span: Span) -> (usize, std::ops::Range<usize>) {
    use codespan_reporting::files::Files;
    let file_id = span.file.0 as usize;
    let line_offset = |line: u32, col: u32| -> usize {
        let line_idx = line.saturating_sub(1) as usize;
        match files.line_range(file_id, line_idx) {
            Ok(r) => (r.start + col.saturating_sub(1) as usize).min(r.end),
            Err(_) => 0,
        }
    };
    let start = line_offset(span.start_line, span.start_col);
    let end = line_offset(span.end_line, span.end_col).max(start);
    (file_id, start..end)
}

/// JSON representation of a diagnostic for IDE integration.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub code: Option<String>,
    pub severity: String,
    pub message: String,
    pub labels: Vec<JsonLabel>,
    pub notes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    pub file: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: Option<String>,
    pub style: String,
}

impl JsonDiagnostic {
    pub fn from_diagnostic(diag: &Diagnostic, files: &SourceManager) -> Self {
        use codespan_reporting::files::Files;

        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file_id = label.file_id;
                let file_name = Files::name(files, file_id).ok()?.to_string();
                let start_location = files.location(file_id, label.range.start).ok()?;
                let end_location = files.location(file_id, label.range.end).ok()?;
                Some(JsonLabel {
                    file: file_name,
                    start_line: start_location.line_number,
                    start_column: start_location.column_number,
                    end_line: end_location.line_number,
                    end_column: end_location.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        codespan_reporting::diagnostic::LabelStyle::Primary => "primary",
                        codespan_reporting::diagnostic::LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.as_ref().map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

fn weed_code(error: &WeedError) -> ErrorCode {
    use WeedError::*;
    match error {
        MissingBody { .. } => ErrorCode("E1001"),
        UnexpectedBody { .. } => ErrorCode("E1002"),
        ConflictingVisibility { .. } => ErrorCode("E1003"),
        AbstractFinalClass { .. } => ErrorCode("E1004"),
        IllegalInterfaceMethodModifier { .. } => ErrorCode("E1005"),
        ConstructorNameMismatch { .. } => ErrorCode("E1006"),
        AbstractField { .. } => ErrorCode("E1007"),
    }
}

fn link_code(error: &LinkError) -> ErrorCode {
    use LinkError::*;
    match error {
        UnresolvedType { .. } => ErrorCode("E2001"),
        PackageDeclCollision { .. } => ErrorCode("E2002"),
        ImportCollision { .. } => ErrorCode("E2003"),
        AmbiguousImport { .. } => ErrorCode("E2004"),
    }
}

fn hierarchy_code(error: &HierarchyError) -> ErrorCode {
    use HierarchyError::*;
    match error {
        ExtendsFinalClass { .. } => ErrorCode("E3001"),
        DuplicateInterface { .. } => ErrorCode("E3002"),
        CyclicInheritance { .. } => ErrorCode("E3003"),
        DuplicateSignature { .. } => ErrorCode("E3004"),
        DuplicateConstructor { .. } => ErrorCode("E3005"),
        IncompatibleReturnType { .. } => ErrorCode("E3006"),
        MissingImplementation { .. } => ErrorCode("E3007"),
        AbstractMethodInConcreteClass { .. } => ErrorCode("E3008"),
        StaticOverridesInstance { .. } => ErrorCode("E3009"),
        InstanceOverridesStatic { .. } => ErrorCode("E3010"),
        ReducedVisibility { .. } => ErrorCode("E3011"),
        OverridesFinal { .. } => ErrorCode("E3012"),
    }
}

fn resolve_code(error: &ResolveError) -> ErrorCode {
    use ResolveError::*;
    match error {
        UnresolvedName { .. } => ErrorCode("E4001"),
        ForwardReference { .. } => ErrorCode("E4002"),
        StaticContextViolation { .. } => ErrorCode("E4003"),
        StaticThroughInstance { .. } => ErrorCode("E4004"),
        Inaccessible { .. } => ErrorCode("E4005"),
        TypeMismatch { .. } => ErrorCode("E4006"),
        InvalidCast { .. } => ErrorCode("E4007"),
        NoMatchingMethod { .. } => ErrorCode("E4008"),
        EntryPointCount { .. } => ErrorCode("E4009"),
    }
}

fn cfg_code(error: &CfgError) -> ErrorCode {
    use CfgError::*;
    match error {
        UnreachableStatement { .. } => ErrorCode("E5001"),
        MissingReturn { .. } => ErrorCode("E5002"),
    }
}

/// The code for a dead-assignment finding (spec §7's only warning kind).
pub const DEAD_ASSIGNMENT_CODE: ErrorCode = ErrorCode("W0001");

impl Diagnostic {
    pub fn from_weed_error(error: &WeedError, files: &SourceManager) -> Self {
        use WeedError::*;
        let code = weed_code(error);
        match error {
            MissingBody { span } => Diagnostic::error("method body required unless abstract or native")
                .with_code(code)
                .with_primary_label(files, *span, "missing body"),
            UnexpectedBody { span } => Diagnostic::error("abstract or native method may not have a body")
                .with_code(code)
                .with_primary_label(files, *span, "unexpected body"),
            ConflictingVisibility { span } => Diagnostic::error("at most one of 'public'/'protected' is allowed")
                .with_code(code)
                .with_primary_label(files, *span, "conflicting visibility modifiers"),
            AbstractFinalClass { span } => Diagnostic::error("a class cannot be both 'abstract' and 'final'")
                .with_code(code)
                .with_primary_label(files, *span, "abstract and final"),
            IllegalInterfaceMethodModifier { modifier, span } => {
                Diagnostic::error(format!("interface method may not be '{}'", modifier))
                    .with_code(code)
                    .with_primary_label(files, *span, "illegal modifier on interface method")
            }
            ConstructorNameMismatch { found, class, span } => Diagnostic::error(format!(
                "constructor name '{}' does not match enclosing class '{}'",
                found, class
            ))
            .with_code(code)
            .with_primary_label(files, *span, "does not match the class name"),
            AbstractField { span } => Diagnostic::error("field may not be 'abstract'")
                .with_code(code)
                .with_primary_label(files, *span, "abstract field"),
        }
    }

    pub fn from_link_error(error: &LinkError, files: &SourceManager) -> Self {
        use LinkError::*;
        let code = link_code(error);
        match error {
            UnresolvedType { name, span } => Diagnostic::error(format!("unresolved type '{}'", name))
                .with_code(code)
                .with_primary_label(files, *span, "no such type"),
            PackageDeclCollision { name, span } => {
                Diagnostic::error(format!("'{}' is both a package and a declaration", name))
                    .with_code(code)
                    .with_primary_label(files, *span, "package/declaration collision")
            }
            ImportCollision { name, span } => Diagnostic::error(format!("duplicate single-type import for '{}'", name))
                .with_code(code)
                .with_primary_label(files, *span, "duplicate import"),
            AmbiguousImport { name, span } => Diagnostic::error(format!(
                "ambiguous type name '{}' (present in more than one on-demand import)",
                name
            ))
            .with_code(code)
            .with_primary_label(files, *span, "ambiguous on-demand import"),
        }
    }

    pub fn from_hierarchy_error(error: &HierarchyError, files: &SourceManager) -> Self {
        use HierarchyError::*;
        let code = hierarchy_code(error);
        match error {
            ExtendsFinalClass { class, parent, span } => {
                Diagnostic::error(format!("class '{}' extends final class '{}'", class, parent))
                    .with_code(code)
                    .with_primary_label(files, *span, "extends a final class")
            }
            DuplicateInterface { name, span } => {
                Diagnostic::error(format!("duplicate interface '{}' in implements/extends clause", name))
                    .with_code(code)
                    .with_primary_label(files, *span, "listed more than once")
            }
            CyclicInheritance { name, span } => Diagnostic::error(format!("cyclic inheritance involving '{}'", name))
                .with_code(code)
                .with_primary_label(files, *span, "part of an inheritance cycle"),
            DuplicateSignature { signature, owner, span } => Diagnostic::error(format!(
                "duplicate method signature '{}' in '{}'",
                signature, owner
            ))
            .with_code(code)
            .with_primary_label(files, *span, "duplicate signature"),
            DuplicateConstructor { signature, owner, span } => Diagnostic::error(format!(
                "duplicate constructor signature '{}' in '{}'",
                signature, owner
            ))
            .with_code(code)
            .with_primary_label(files, *span, "duplicate constructor"),
            IncompatibleReturnType { signature, span } => Diagnostic::error(format!(
                "method '{}' declared with incompatible return types across the hierarchy",
                signature
            ))
            .with_code(code)
            .with_primary_label(files, *span, "incompatible return type"),
            MissingImplementation { class, signature, span } => Diagnostic::error(format!(
                "non-abstract class '{}' does not implement inherited abstract method '{}'",
                class, signature
            ))
            .with_code(code)
            .with_primary_label(files, *span, "inherited here without an implementation")
            .with_help(format!("implement '{}' in '{}' or declare it abstract", signature, class)),
            AbstractMethodInConcreteClass { class, signature, span } => Diagnostic::error(format!(
                "non-abstract class '{}' may not declare abstract method '{}'",
                class, signature
            ))
            .with_code(code)
            .with_primary_label(files, *span, "abstract method in concrete class"),
            StaticOverridesInstance { signature, span } => {
                Diagnostic::error(format!("static method '{}' cannot override instance method", signature))
                    .with_code(code)
                    .with_primary_label(files, *span, "static/instance mismatch")
            }
            InstanceOverridesStatic { signature, span } => {
                Diagnostic::error(format!("instance method '{}' cannot override static method", signature))
                    .with_code(code)
                    .with_primary_label(files, *span, "static/instance mismatch")
            }
            ReducedVisibility { signature, span } => {
                Diagnostic::error(format!("overriding method '{}' may not reduce visibility", signature))
                    .with_code(code)
                    .with_primary_label(files, *span, "reduced visibility")
            }
            OverridesFinal { signature, span } => {
                Diagnostic::error(format!("method '{}' may not override final method", signature))
                    .with_code(code)
                    .with_primary_label(files, *span, "overrides a final method")
            }
        }
    }

    pub fn from_resolve_error(error: &ResolveError, files: &SourceManager) -> Self {
        use ResolveError::*;
        let code = resolve_code(error);
        match error {
            UnresolvedName { name, span } => Diagnostic::error(format!("cannot find name '{}'", name))
                .with_code(code)
                .with_primary_label(files, *span, "not found in this scope"),
            ForwardReference { name, span } => Diagnostic::error(format!("forward reference to instance field '{}'", name))
                .with_code(code)
                .with_primary_label(files, *span, "used before its declaration"),
            StaticContextViolation { name, span } => Diagnostic::error(format!(
                "cannot access instance member '{}' in static context",
                name
            ))
            .with_code(code)
            .with_primary_label(files, *span, "instance member in static context"),
            StaticThroughInstance { name, span } => Diagnostic::error(format!(
                "cannot access static field '{}' through an instance expression",
                name
            ))
            .with_code(code)
            .with_primary_label(files, *span, "static field accessed through an instance"),
            Inaccessible { name, span } => Diagnostic::error(format!("member '{}' is not accessible from here", name))
                .with_code(code)
                .with_primary_label(files, *span, "not accessible"),
            TypeMismatch { expected, actual, span } => Diagnostic::error(format!(
                "type mismatch: expected '{}', found '{}'",
                expected, actual
            ))
            .with_code(code)
            .with_primary_label(files, *span, format!("expected '{}', found '{}'", expected, actual)),
            InvalidCast { from, to, span } => Diagnostic::error(format!("invalid cast from '{}' to '{}'", from, to))
                .with_code(code)
                .with_primary_label(files, *span, "invalid cast"),
            NoMatchingMethod { name, span } => {
                Diagnostic::error(format!("no method '{}' with a matching signature found", name))
                    .with_code(code)
                    .with_primary_label(files, *span, "no matching overload")
            }
            EntryPointCount { count } => Diagnostic::error(format!(
                "expected exactly one 'public static int test()' method, found {}",
                count
            ))
            .with_code(code),
        }
    }

    pub fn from_cfg_error(error: &CfgError, files: &SourceManager) -> Self {
        use CfgError::*;
        let code = cfg_code(error);
        match error {
            UnreachableStatement { span } => Diagnostic::error("unreachable statement")
                .with_code(code)
                .with_primary_label(files, *span, "this statement is unreachable"),
            MissingReturn { method, span } => Diagnostic::error(format!(
                "missing return on some path of non-void method '{}'",
                method
            ))
            .with_code(code)
            .with_primary_label(files, *span, "not every path returns a value"),
        }
    }

    pub fn from_dead_assignment(warning: &DeadAssignment, files: &SourceManager) -> Self {
        Diagnostic::warning(format!("value assigned to '{}' is never read", warning.variable))
            .with_code(DEAD_ASSIGNMENT_CODE)
            .with_primary_label(files, warning.span, "dead assignment")
    }
}

/// Render every error in a [`CheckErrors`] batch as diagnostics, in phase
/// order.
pub fn from_check_errors(errors: &CheckErrors, files: &SourceManager) -> Vec<Diagnostic> {
    match errors {
        CheckErrors::Weed(es) => es.iter().map(|e| Diagnostic::from_weed_error(e, files)).collect(),
        CheckErrors::Link(es) => es.iter().map(|e| Diagnostic::from_link_error(e, files)).collect(),
        CheckErrors::Hierarchy(es) => es.iter().map(|e| Diagnostic::from_hierarchy_error(e, files)).collect(),
        CheckErrors::Resolve(es) => es.iter().map(|e| Diagnostic::from_resolve_error(e, files)).collect(),
        CheckErrors::Cfg(es) => es.iter().map(|e| Diagnostic::from_cfg_error(e, files)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joos_parser::FileId;

    fn one_file_manager(source: &str) -> SourceManager {
        let mut files = SourceManager::new();
        files.add_file("Test.java", source);
        files
    }

    #[test]
    fn error_diagnostic_has_error_severity() {
        let diag = Diagnostic::error("test error message");
        assert_eq!(diag.inner.severity, Severity::Error);
    }

    #[test]
    fn diagnostic_carries_its_code() {
        let diag = Diagnostic::error("test error").with_code(ErrorCode("E2001"));
        assert_eq!(diag.code, Some(ErrorCode("E2001")));
    }

    #[test]
    fn unresolved_type_renders_with_its_code_and_label() {
        let files = one_file_manager("class A extends B {}\n");
        let error = LinkError::UnresolvedType {
            name: "B".to_string(),
            span: Span::new(FileId(0), 1, 18, 1, 19),
        };
        let diag = Diagnostic::from_link_error(&error, &files);
        assert_eq!(diag.code, Some(ErrorCode("E2001")));
        assert!(diag.inner.message.contains("B"));
        assert_eq!(diag.inner.labels.len(), 1);
    }

    #[test]
    fn dead_assignment_is_a_warning_not_an_error() {
        let files = one_file_manager("class A { void m() { int x = 1; } }\n");
        let warning = DeadAssignment { variable: "x".to_string(), span: Span::new(FileId(0), 1, 26, 1, 27) };
        let diag = Diagnostic::from_dead_assignment(&warning, &files);
        assert_eq!(diag.inner.severity, Severity::Warning);
        assert_eq!(diag.code, Some(DEAD_ASSIGNMENT_CODE));
    }

    #[test]
    fn json_output_contains_expected_fields() {
        let files = one_file_manager("class A extends B {}\n");
        let error = LinkError::UnresolvedType {
            name: "B".to_string(),
            span: Span::new(FileId(0), 1, 18, 1, 19),
        };
        let diag = Diagnostic::from_link_error(&error, &files);
        let json = diag.to_json(&files).unwrap();
        assert!(json.contains("\"code\""));
        assert!(json.contains("\"E2001\""));
        assert!(json.contains("\"severity\""));
        assert!(json.contains("\"labels\""));
    }
}
