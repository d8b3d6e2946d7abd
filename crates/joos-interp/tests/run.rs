//! End-to-end tests: parse -> check -> lower -> interpret, asserting on the
//! exit code and captured output the way a `joos-cli` driver would.

use joos_parser::FileId;

fn run(source: &str) -> joos_interp::RunOutcome {
    run_units(&[source])
}

/// Each compilation unit holds exactly one top-level type declaration
/// (`joos_parser::ast::CompilationUnit::type_decl` is singular), so a
/// multi-class program needs one source string per class.
fn run_units(sources: &[&str]) -> joos_interp::RunOutcome {
    let units: Vec<_> = sources
        .iter()
        .enumerate()
        .map(|(i, src)| joos_parser::parse_file(FileId(i as u32), src).expect("parse failed"))
        .collect();
    let mut checked = joos_checker::check(&units).expect("check failed");
    let lowered = joos_compiler::lower::lower_program(&mut checked.program, &checked.resolutions, &units, checked.entry_point)
        .expect("lowering failed");
    joos_interp::run_program(&lowered).expect("interpretation failed")
}

#[test]
fn returns_the_entry_points_literal_value() {
    let outcome = run(
        "public class Main {\n\
             public Main() {}\n\
             public static int test() {\n\
                 return 42;\n\
             }\n\
         }\n",
    );
    assert_eq!(outcome.exit_code, 42);
}

#[test]
fn runs_arithmetic_and_field_assignment() {
    let outcome = run(
        "public class Counter {\n\
             protected int value;\n\
             public Counter() { value = 10; }\n\
             public int increment(int by) { value = value + by; return value; }\n\
             public static int test() {\n\
                 Counter c = new Counter();\n\
                 c.increment(5);\n\
                 return c.increment(1);\n\
             }\n\
         }\n",
    );
    assert_eq!(outcome.exit_code, 16);
}

#[test]
fn evaluates_a_while_loop() {
    let outcome = run(
        "public class Loop {\n\
             public Loop() {}\n\
             public static int test() {\n\
                 int i = 0;\n\
                 int sum = 0;\n\
                 while (i < 5) {\n\
                     sum = sum + i;\n\
                     i = i + 1;\n\
                 }\n\
                 return sum;\n\
             }\n\
         }\n",
    );
    assert_eq!(outcome.exit_code, 10);
}

#[test]
fn traps_on_division_by_zero() {
    let outcome = run(
        "public class DivByZero {\n\
             public DivByZero() {}\n\
             public static int test() {\n\
                 int zero = 0;\n\
                 return 10 / zero;\n\
             }\n\
         }\n",
    );
    assert_eq!(outcome.exit_code, 13);
}

#[test]
fn instanceof_is_true_for_a_subclass_and_false_for_an_unrelated_class() {
    let outcome = run_units(&[
        "public class Animal {\n\
             public Animal() {}\n\
         }\n",
        "public class Dog extends Animal {\n\
             public Dog() {}\n\
         }\n",
        "public class Rock {\n\
             public Rock() {}\n\
         }\n",
        "public class Main {\n\
             public Main() {}\n\
             public static int test() {\n\
                 Animal a = new Dog();\n\
                 if (!(a instanceof Dog)) { return 1; }\n\
                 Object o = new Rock();\n\
                 if (o instanceof Dog) { return 2; }\n\
                 return 0;\n\
             }\n\
         }\n",
    ]);
    assert_eq!(outcome.exit_code, 0);
}

#[test]
fn concatenates_string_literals_without_trapping() {
    let outcome = run(
        "public class Greeting {\n\
             public Greeting() {}\n\
             public static int test() {\n\
                 String s = \"foo\" + \"bar\" + 1;\n\
                 return 0;\n\
             }\n\
         }\n",
    );
    assert_eq!(outcome.exit_code, 0);
}
