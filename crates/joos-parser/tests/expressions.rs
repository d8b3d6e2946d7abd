use joos_parser::ast::*;
use joos_parser::{parse_file, FileId};

/// Parses `src` as the body of `int m() { return <src>; }` and returns the
/// return expression, so tests can focus purely on expression grammar.
fn parse_expr(src: &str) -> Expr {
    let wrapped = format!("class T {{ int m() {{ return {src}; }} }}");
    let unit = parse_file(FileId(0), &wrapped).expect("expected successful parse");
    let TypeDecl::Class(c) = unit.type_decl else { panic!("expected class") };
    let Stmt::Return(r) = &c.methods[0].body.as_ref().unwrap().statements[0] else {
        panic!("expected return statement")
    };
    r.value.clone().expect("expected return value")
}

#[test]
fn parses_precedence_of_arithmetic() {
    let e = parse_expr("1 + 2 * 3");
    let Expr::Binary { op: BinaryOp::Add, right, .. } = e else { panic!("expected add at top") };
    assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
}

#[test]
fn parses_left_associative_subtraction() {
    let e = parse_expr("10 - 3 - 2");
    let Expr::Binary { op: BinaryOp::Sub, left, .. } = e else { panic!("expected sub at top") };
    assert!(matches!(*left, Expr::Binary { op: BinaryOp::Sub, .. }));
}

#[test]
fn parses_logical_and_below_or() {
    let e = parse_expr("a || b && c");
    assert!(matches!(e, Expr::Binary { op: BinaryOp::LazyOr, .. }));
}

#[test]
fn parses_instanceof() {
    let e = parse_expr("o instanceof String");
    let Expr::InstanceOf { target_type, .. } = e else { panic!("expected instanceof") };
    match target_type {
        TypeRef::Named(n) => assert_eq!(n.simple_name(), "String"),
        _ => panic!("expected named type"),
    }
}

#[test]
fn disambiguates_primitive_cast_from_parens() {
    let e = parse_expr("(int) x");
    assert!(matches!(e, Expr::Cast { .. }));
}

#[test]
fn disambiguates_reference_cast_from_parens() {
    let e = parse_expr("(String) x");
    assert!(matches!(e, Expr::Cast { .. }));
}

#[test]
fn parenthesized_expression_is_not_a_cast() {
    let e = parse_expr("(x) - 1");
    let Expr::Binary { op: BinaryOp::Sub, left, .. } = e else { panic!("expected subtraction") };
    assert!(matches!(*left, Expr::Name(_)));
}

#[test]
fn parses_field_access_chain() {
    let e = parse_expr("a.b.c");
    let Expr::FieldAccess { name, target, .. } = e else { panic!("expected field access") };
    assert_eq!(name.name, "c");
    assert!(matches!(*target, Expr::Name(_)));
}

#[test]
fn parses_unqualified_and_qualified_method_calls() {
    let e = parse_expr("foo(1, 2)");
    let Expr::MethodCall { target, method, args, .. } = e else { panic!("expected call") };
    assert!(target.is_none());
    assert_eq!(method.name, "foo");
    assert_eq!(args.len(), 2);

    let e2 = parse_expr("this.bar()");
    let Expr::MethodCall { target, method, .. } = e2 else { panic!("expected call") };
    assert!(matches!(target.unwrap().as_ref(), Expr::This { .. }));
    assert_eq!(method.name, "bar");
}

#[test]
fn parses_array_creation_and_access() {
    let e = parse_expr("new int[5]");
    assert!(matches!(e, Expr::NewArray { .. }));

    let e2 = parse_expr("xs[0]");
    assert!(matches!(e2, Expr::ArrayAccess { .. }));
}

#[test]
fn parses_object_creation() {
    let e = parse_expr("new Point(1, 2)");
    let Expr::NewObject { class, args, .. } = e else { panic!("expected object creation") };
    assert_eq!(args.len(), 2);
    match class {
        TypeRef::Named(n) => assert_eq!(n.simple_name(), "Point"),
        _ => panic!("expected named type"),
    }
}

#[test]
fn parses_assignment_as_right_associative() {
    let e = parse_expr("a = b = 1");
    let Expr::Assign { value, .. } = e else { panic!("expected assignment") };
    assert!(matches!(*value, Expr::Assign { .. }));
}

#[test]
fn parses_unary_negation_and_not() {
    assert!(matches!(parse_expr("-x"), Expr::Unary { op: UnaryOp::Neg, .. }));
    assert!(matches!(parse_expr("!flag"), Expr::Unary { op: UnaryOp::Not, .. }));
}
