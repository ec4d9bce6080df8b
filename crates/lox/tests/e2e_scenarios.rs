//! End-to-end scenarios: source in, captured `print` output out, run through the full
//! scan → parse → resolve → evaluate pipeline.

use lox::{CollectStringPrint, Interpreter};

/// Runs `source` to completion and returns the lines `print` wrote, in order.
fn run(source: &str) -> Vec<String> {
    let writer = CollectStringPrint::new();
    let lines = writer.lines();
    let mut interpreter = Interpreter::new(Box::new(writer));

    let (tokens, scan_errors) = lox::lexer::scan(source);
    assert!(scan_errors.is_empty(), "unexpected scan errors: {scan_errors:?}");

    let (statements, parse_errors) = lox::parser::parse(tokens);
    assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");

    let (depths, resolve_errors) = lox::resolver::resolve(&statements);
    assert!(resolve_errors.is_empty(), "unexpected resolve errors: {resolve_errors:?}");

    interpreter.set_depths(depths);
    interpreter.interpret(&statements).expect("program should run without a runtime error");

    lines.borrow().clone()
}

#[test]
fn addition_of_two_integer_literals() {
    assert_eq!(run("print 1 + 2;"), vec!["3"]);
}

#[test]
fn addition_of_two_variables() {
    assert_eq!(run("var a = 1; var b = 2; print a + b;"), vec!["3"]);
}

#[test]
fn block_scoping_shadows_then_restores_the_outer_binding() {
    assert_eq!(
        run(r#"var a = "hello"; { var a = "world"; print a; } print a;"#),
        vec!["world", "hello"]
    );
}

#[test]
fn recursive_fibonacci() {
    assert_eq!(
        run("fun fib(n) { if (n < 2) return n; return fib(n-1) + fib(n-2); } print fib(10);"),
        vec!["55"]
    );
}

#[test]
fn closures_capture_the_variable_by_reference_not_by_value() {
    assert_eq!(
        run("fun mk() { var i = 0; fun inc() { i = i + 1; return i; } return inc; } var c = mk(); print c(); print c(); print c();"),
        vec!["1", "2", "3"]
    );
}

#[test]
fn calling_a_method_on_an_instance() {
    assert_eq!(run(r#"class A { greet() { print "hi"; } } var a = A(); a.greet();"#), vec!["hi"]);
}

#[test]
fn initializer_sets_a_field_readable_right_after_construction() {
    assert_eq!(run("class A { init(x) { this.x = x; } } print A(7).x;"), vec!["7"]);
}
