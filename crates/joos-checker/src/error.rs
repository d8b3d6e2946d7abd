//! One `thiserror` enum per static-semantics pass, matching spec §7's
//! "reported once with source range and phase" model — each variant names
//! the phase implicitly by which enum it lives in.

use joos_parser::Span;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WeedError {
    #[error("method body required unless abstract or native")]
    MissingBody { span: Span },
    #[error("abstract or native method may not have a body")]
    UnexpectedBody { span: Span },
    #[error("at most one of 'public'/'protected' is allowed")]
    ConflictingVisibility { span: Span },
    #[error("a class cannot be both 'abstract' and 'final'")]
    AbstractFinalClass { span: Span },
    #[error("interface method may not be '{modifier}'")]
    IllegalInterfaceMethodModifier { modifier: &'static str, span: Span },
    #[error("constructor name '{found}' does not match enclosing class '{class}'")]
    ConstructorNameMismatch { found: String, class: String, span: Span },
    #[error("field may not be 'abstract'")]
    AbstractField { span: Span },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LinkError {
    #[error("unresolved type '{name}'")]
    UnresolvedType { name: String, span: Span },
    #[error("'{name}' is both a package and a declaration")]
    PackageDeclCollision { name: String, span: Span },
    #[error("duplicate single-type import for '{name}'")]
    ImportCollision { name: String, span: Span },
    #[error("ambiguous type name '{name}' (present in more than one on-demand import)")]
    AmbiguousImport { name: String, span: Span },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum HierarchyError {
    #[error("class '{class}' extends final class '{parent}'")]
    ExtendsFinalClass { class: String, parent: String, span: Span },
    #[error("duplicate interface '{name}' in implements/extends clause")]
    DuplicateInterface { name: String, span: Span },
    #[error("cyclic inheritance involving '{name}'")]
    CyclicInheritance { name: String, span: Span },
    #[error("duplicate method signature '{signature}' in '{owner}'")]
    DuplicateSignature { signature: String, owner: String, span: Span },
    #[error("duplicate constructor signature '{signature}' in '{owner}'")]
    DuplicateConstructor { signature: String, owner: String, span: Span },
    #[error("method '{signature}' declared with incompatible return types across the hierarchy")]
    IncompatibleReturnType { signature: String, span: Span },
    #[error("non-abstract class '{class}' does not implement inherited abstract method '{signature}'")]
    MissingImplementation { class: String, signature: String, span: Span },
    #[error("non-abstract class '{class}' may not declare abstract method '{signature}'")]
    AbstractMethodInConcreteClass { class: String, signature: String, span: Span },
    #[error("static method '{signature}' cannot override instance method")]
    StaticOverridesInstance { signature: String, span: Span },
    #[error("instance method '{signature}' cannot override static method")]
    InstanceOverridesStatic { signature: String, span: Span },
    #[error("overriding method '{signature}' may not reduce visibility")]
    ReducedVisibility { signature: String, span: Span },
    #[error("method '{signature}' may not override final method")]
    OverridesFinal { signature: String, span: Span },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error("cannot find name '{name}'")]
    UnresolvedName { name: String, span: Span },
    #[error("forward reference to instance field '{name}'")]
    ForwardReference { name: String, span: Span },
    #[error("cannot access instance member '{name}' in static context")]
    StaticContextViolation { name: String, span: Span },
    #[error("cannot access static field '{name}' through an instance expression")]
    StaticThroughInstance { name: String, span: Span },
    #[error("member '{name}' is not accessible from here")]
    Inaccessible { name: String, span: Span },
    #[error("type mismatch: expected '{expected}', found '{actual}'")]
    TypeMismatch { expected: String, actual: String, span: Span },
    #[error("invalid cast from '{from}' to '{to}'")]
    InvalidCast { from: String, to: String, span: Span },
    #[error("no method '{name}' with a matching signature found")]
    NoMatchingMethod { name: String, span: Span },
    #[error("expected exactly one 'public static int test()' method, found {count}")]
    EntryPointCount { count: usize },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CfgError {
    #[error("unreachable statement")]
    UnreachableStatement { span: Span },
    #[error("missing return on some path of non-void method '{method}'")]
    MissingReturn { method: String, span: Span },
}

/// A dead-assignment finding is a warning (spec §7), not an error: it never
/// changes the exit code, so it is not part of `CfgError`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadAssignment {
    pub variable: String,
    pub span: Span,
}
