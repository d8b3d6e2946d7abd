use joos_parser::ast::*;
use joos_parser::{parse_file, FileId};

/// Parses `src` as a method body and returns its statements.
fn parse_body(src: &str) -> Vec<Stmt> {
    let wrapped = format!("class T {{ void m() {{ {src} }} }}");
    let unit = parse_file(FileId(0), &wrapped).expect("expected successful parse");
    let TypeDecl::Class(c) = unit.type_decl else { panic!("expected class") };
    c.methods[0].body.clone().unwrap().statements
}

#[test]
fn parses_local_var_decl() {
    let stmts = parse_body("int x = 1;");
    let Stmt::LocalVarDecl(d) = &stmts[0] else { panic!("expected local var decl") };
    assert_eq!(d.name.name, "x");
    assert!(matches!(d.ty, TypeRef::Primitive(PrimitiveTypeName::Int, _)));
}

#[test]
fn distinguishes_decl_from_assignment_expression() {
    let stmts = parse_body("a[0] = 1;");
    assert!(matches!(stmts[0], Stmt::Expression(_)));
}

#[test]
fn distinguishes_array_decl_from_array_index_assignment() {
    let stmts = parse_body("int[] a = null; a[0] = 1;");
    assert!(matches!(stmts[0], Stmt::LocalVarDecl(_)));
    assert!(matches!(stmts[1], Stmt::Expression(_)));
}

#[test]
fn parses_if_else() {
    let stmts = parse_body("if (x) { return; } else { return; }");
    let Stmt::If(s) = &stmts[0] else { panic!("expected if") };
    assert!(s.else_branch.is_some());
}

#[test]
fn parses_if_without_else() {
    let stmts = parse_body("if (x) return;");
    let Stmt::If(s) = &stmts[0] else { panic!("expected if") };
    assert!(s.else_branch.is_none());
}

#[test]
fn parses_while_loop() {
    let stmts = parse_body("while (x < 10) { x = x + 1; }");
    assert!(matches!(stmts[0], Stmt::While(_)));
}

#[test]
fn parses_for_loop_with_all_clauses() {
    let stmts = parse_body("for (int i = 0; i < 10; i = i + 1) { x = i; }");
    let Stmt::For(f) = &stmts[0] else { panic!("expected for") };
    assert!(f.init.is_some());
    assert!(f.condition.is_some());
    assert!(f.update.is_some());
}

#[test]
fn parses_for_loop_with_omitted_clauses() {
    let stmts = parse_body("for (;;) { return; }");
    let Stmt::For(f) = &stmts[0] else { panic!("expected for") };
    assert!(f.init.is_none());
    assert!(f.condition.is_none());
    assert!(f.update.is_none());
}

#[test]
fn parses_null_statement() {
    let stmts = parse_body(";");
    assert!(matches!(stmts[0], Stmt::Null(..)));
}

#[test]
fn parses_return_with_and_without_value() {
    let stmts = parse_body("return 1;");
    let Stmt::Return(r) = &stmts[0] else { panic!("expected return") };
    assert!(r.value.is_some());

    let stmts2 = parse_body("return;");
    let Stmt::Return(r2) = &stmts2[0] else { panic!("expected return") };
    assert!(r2.value.is_none());
}

#[test]
fn parses_nested_blocks() {
    let stmts = parse_body("{ { return; } }");
    let Stmt::Block(outer) = &stmts[0] else { panic!("expected block") };
    assert!(matches!(outer.statements[0], Stmt::Block(_)));
}
