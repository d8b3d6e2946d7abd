//! Modifier-combination legality, run immediately after parsing and before
//! the type linker (spec §2's "no component proceeds on a program that
//! failed an earlier one"). The grammar accepts any modifier set syntactically
//! valid tokens can form; the checks that a grammar alone cannot express live
//! here, grounded on `original_source/src/weeder`.

use crate::error::WeedError;
use joos_parser::ast::{ClassDecl, CompilationUnit, FieldDecl, InterfaceDecl, MethodDecl, TypeDecl};

pub fn weed_unit(unit: &CompilationUnit) -> Vec<WeedError> {
    let mut errors = Vec::new();
    match &unit.type_decl {
        TypeDecl::Class(c) => weed_class(c, &mut errors),
        TypeDecl::Interface(i) => weed_interface(i, &mut errors),
    }
    errors
}

fn weed_class(class: &ClassDecl, errors: &mut Vec<WeedError>) {
    if class.modifiers.public && class.modifiers.protected {
        errors.push(WeedError::ConflictingVisibility { span: class.span });
    }
    if class.modifiers.abstract_ && class.modifiers.final_ {
        errors.push(WeedError::AbstractFinalClass { span: class.span });
    }

    for field in &class.fields {
        weed_field(field, errors);
    }
    for ctor in &class.constructors {
        if ctor.name.name != class.name.name {
            errors.push(WeedError::ConstructorNameMismatch {
                found: ctor.name.name.clone(),
                class: class.name.name.clone(),
                span: ctor.span,
            });
        }
        weed_method_body(ctor, errors);
    }
    for method in &class.methods {
        weed_method_body(method, errors);
        weed_visibility(method.modifiers.public, method.modifiers.protected, method.span, errors);
    }
}

fn weed_interface(iface: &InterfaceDecl, errors: &mut Vec<WeedError>) {
    if iface.modifiers.public && iface.modifiers.protected {
        errors.push(WeedError::ConflictingVisibility { span: iface.span });
    }
    for method in &iface.methods {
        if method.modifiers.is_static {
            errors.push(WeedError::IllegalInterfaceMethodModifier { modifier: "static", span: method.span });
        }
        if method.modifiers.final_ {
            errors.push(WeedError::IllegalInterfaceMethodModifier { modifier: "final", span: method.span });
        }
        if method.modifiers.native {
            errors.push(WeedError::IllegalInterfaceMethodModifier { modifier: "native", span: method.span });
        }
        if method.body.is_some() {
            errors.push(WeedError::UnexpectedBody { span: method.span });
        }
    }
}

fn weed_field(field: &FieldDecl, errors: &mut Vec<WeedError>) {
    if field.modifiers.abstract_ {
        errors.push(WeedError::AbstractField { span: field.span });
    }
    weed_visibility(field.modifiers.public, field.modifiers.protected, field.span, errors);
}

fn weed_visibility(public: bool, protected: bool, span: joos_parser::Span, errors: &mut Vec<WeedError>) {
    if public && protected {
        errors.push(WeedError::ConflictingVisibility { span });
    }
}

fn weed_method_body(method: &MethodDecl, errors: &mut Vec<WeedError>) {
    let must_be_bodyless = method.modifiers.abstract_ || method.modifiers.native;
    match (must_be_bodyless, method.body.is_some()) {
        (true, true) => errors.push(WeedError::UnexpectedBody { span: method.span }),
        (false, false) => errors.push(WeedError::MissingBody { span: method.span }),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joos_parser::parse_file;
    use joos_parser::FileId;

    fn parse(src: &str) -> CompilationUnit {
        parse_file(FileId(0), src).expect("parse")
    }

    #[test]
    fn abstract_method_with_body_is_rejected() {
        let unit = parse("abstract class A { public A() {} public abstract void m() { } }");
        let errors = weed_unit(&unit);
        assert!(errors.iter().any(|e| matches!(e, WeedError::UnexpectedBody { .. })));
    }

    #[test]
    fn concrete_method_without_body_is_rejected() {
        let unit = parse("class A { public A() {} public void m(); }");
        let errors = weed_unit(&unit);
        assert!(errors.iter().any(|e| matches!(e, WeedError::MissingBody { .. })));
    }

    #[test]
    fn abstract_and_final_class_is_rejected() {
        let unit = parse("abstract final class A { public A() {} }");
        let errors = weed_unit(&unit);
        assert!(errors.iter().any(|e| matches!(e, WeedError::AbstractFinalClass { .. })));
    }

    #[test]
    fn constructor_name_must_match_class() {
        let unit = parse("class A { public A() {} }");
        let errors = weed_unit(&unit);
        assert!(errors.is_empty());
    }

    #[test]
    fn interface_method_cannot_be_static() {
        let unit = parse("interface I { static int m(); }");
        let errors = weed_unit(&unit);
        assert!(errors
            .iter()
            .any(|e| matches!(e, WeedError::IllegalInterfaceMethodModifier { modifier: "static", .. })));
    }
}
