use joos_parser::ast::*;
use joos_parser::{parse_file, FileId};

fn parse(src: &str) -> CompilationUnit {
    parse_file(FileId(0), src).expect("expected successful parse")
}

fn parse_err(src: &str) -> Vec<joos_parser::ParseError> {
    parse_file(FileId(0), src).expect_err("expected parse error")
}

#[test]
fn parses_package_and_imports() {
    let unit = parse(
        "package a.b;\nimport java.util.List;\nimport java.io.*;\npublic class Main {}",
    );
    let pkg = unit.package.expect("package");
    assert_eq!(pkg.path.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(unit.imports.len(), 2);
    assert!(!unit.imports[0].on_demand);
    assert!(unit.imports[1].on_demand);
}

#[test]
fn parses_empty_class() {
    let unit = parse("public class Empty {}");
    match unit.type_decl {
        TypeDecl::Class(c) => {
            assert_eq!(c.name.name, "Empty");
            assert!(c.modifiers.public);
            assert!(c.fields.is_empty());
            assert!(c.methods.is_empty());
        }
        TypeDecl::Interface(_) => panic!("expected class"),
    }
}

#[test]
fn parses_class_with_extends_and_implements() {
    let unit = parse("public class Dog extends Animal implements Runnable, Named {}");
    let TypeDecl::Class(c) = unit.type_decl else { panic!("expected class") };
    assert_eq!(c.super_class.unwrap().simple_name(), "Animal");
    assert_eq!(c.interfaces.len(), 2);
    assert_eq!(c.interfaces[1].simple_name(), "Named");
}

#[test]
fn parses_field_with_initializer() {
    let unit = parse("public class A { public static int count = 0; }");
    let TypeDecl::Class(c) = unit.type_decl else { panic!("expected class") };
    assert_eq!(c.fields.len(), 1);
    let f = &c.fields[0];
    assert!(f.modifiers.is_static);
    assert_eq!(f.name.name, "count");
    assert!(matches!(f.initializer, Some(Expr::Literal { value: Literal::Int(0), .. })));
}

#[test]
fn parses_constructor_and_method() {
    let unit = parse(
        "public class A {\n\
         public A() {}\n\
         public int get() { return 1; }\n\
         }",
    );
    let TypeDecl::Class(c) = unit.type_decl else { panic!("expected class") };
    assert_eq!(c.constructors.len(), 1);
    assert_eq!(c.methods.len(), 1);
    assert_eq!(c.methods[0].name.name, "get");
    assert!(c.methods[0].body.is_some());
}

#[test]
fn parses_abstract_method_without_body() {
    let unit = parse("public abstract class A { public abstract void run(); }");
    let TypeDecl::Class(c) = unit.type_decl else { panic!("expected class") };
    assert!(c.methods[0].body.is_none());
}

#[test]
fn parses_interface_with_extends() {
    let unit = parse("public interface Shape extends Named, Sized { int area(); }");
    let TypeDecl::Interface(i) = unit.type_decl else { panic!("expected interface") };
    assert_eq!(i.extends.len(), 2);
    assert_eq!(i.methods.len(), 1);
    assert!(i.methods[0].body.is_none());
}

#[test]
fn parses_array_field_and_param() {
    let unit = parse("public class A { public int[] values; public void set(int[] v) {} }");
    let TypeDecl::Class(c) = unit.type_decl else { panic!("expected class") };
    assert!(matches!(c.fields[0].ty, TypeRef::Array(..)));
    assert!(matches!(c.methods[0].params[0].ty, TypeRef::Array(..)));
}

#[test]
fn rejects_missing_top_level_type() {
    let errors = parse_err("package a;\n");
    assert!(!errors.is_empty());
}

#[test]
fn rejects_trailing_garbage_after_type() {
    let errors = parse_err("public class A {} public class B {}");
    assert!(!errors.is_empty());
}
