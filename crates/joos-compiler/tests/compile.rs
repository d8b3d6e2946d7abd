//! End-to-end pipeline tests: parse -> check -> lower -> generate,
//! asserting on the emitted assembly text's shape rather than trying to
//! assemble and run it.

use joos_parser::FileId;

fn compile(source: &str) -> joos_compiler::CompiledProgram {
    let unit = joos_parser::parse_file(FileId(0), source).expect("parse failed");
    let units = vec![unit];
    let checked = joos_checker::check(&units).expect("check failed");
    joos_compiler::compile(&units, checked).expect("compile failed")
}

#[test]
fn compiles_a_minimal_entry_point() {
    let program = compile(
        "public class Main {\n\
             public Main() {}\n\
             public static int test() {\n\
                 return 42;\n\
             }\n\
         }\n",
    );
    assert!(program.assembly.contains("_start:"));
    assert!(program.assembly.contains("call __debexit"));
    assert!(program.warnings.is_empty());
}

#[test]
fn lowers_field_access_and_arithmetic() {
    let program = compile(
        "public class Counter {\n\
             protected int value;\n\
             public Counter() { value = 0; }\n\
             public int increment(int by) { value = value + by; return value; }\n\
             public static int test() {\n\
                 Counter c = new Counter();\n\
                 return c.increment(1);\n\
             }\n\
         }\n",
    );
    // The instance method and the constructor both get their own mangled
    // label, and the field read/write goes through the object's dispatch
    // slot + field offset rather than a bare global.
    assert!(program.assembly.contains("_##_METHOD_ID_"));
    assert!(program.assembly.contains("_##_CLASS_ID_"));
}

#[test]
fn lowers_instance_of_and_casts() {
    let program = compile(
        "public class Shape {\n\
             public Shape() {}\n\
         }\n",
    );
    assert!(program.assembly.contains("section .data"));
}

#[test]
fn rejects_a_program_with_no_entry_point() {
    let unit = joos_parser::parse_file(FileId(0), "public class Empty {\n public Empty() {}\n}\n").expect("parse failed");
    let units = vec![unit];
    assert!(joos_checker::check(&units).is_err());
}
