//! Error-path scenarios: programs that are expected to fail at a specific pipeline
//! stage, with the matching exit code and message.

use lox::{Interpreter, LoxError, NoPrint};

fn run(source: &str) -> Result<(), LoxError> {
    let (tokens, scan_errors) = lox::lexer::scan(source);
    if !scan_errors.is_empty() {
        return Err(scan_errors.into());
    }

    let (statements, parse_errors) = lox::parser::parse(tokens);
    if !parse_errors.is_empty() {
        return Err(parse_errors.into());
    }

    let (depths, resolve_errors) = lox::resolver::resolve(&statements);
    if !resolve_errors.is_empty() {
        return Err(resolve_errors.into());
    }

    let mut interpreter = Interpreter::new(Box::new(NoPrint));
    interpreter.set_depths(depths);
    interpreter.interpret(&statements).map_err(Into::into)
}

#[test]
fn adding_a_string_and_a_number_is_a_runtime_error() {
    let err = run(r#""a" + 1;"#).expect_err("mismatched operand types must fail at runtime");
    assert_eq!(err.exit_code(), 70);
    assert!(
        err.to_string().contains("Operands must be two numbers or two strings."),
        "unexpected message: {err}"
    );
}

#[test]
fn a_local_initializer_cannot_read_its_own_name() {
    let err = run("{ var a = 1; { var a = a; } }").expect_err("self-referential initializer must be rejected");
    assert_eq!(err.exit_code(), 65);
}

#[test]
fn returning_from_top_level_code_is_a_resolver_error() {
    let err = run("return 1;").expect_err("top-level return must be rejected");
    assert_eq!(err.exit_code(), 65);
    assert!(
        err.to_string().contains("Can't return from top-level code."),
        "unexpected message: {err}"
    );
}

#[test]
fn a_pathological_self_recursive_function_hits_the_recursion_guard_instead_of_overflowing_the_stack() {
    let err = run("fun loop() { return loop(); } loop();").expect_err("unbounded recursion must be caught");
    assert_eq!(err.exit_code(), 70);
    assert!(err.to_string().contains("Stack overflow."), "unexpected message: {err}");
}

#[test]
fn a_runtime_error_inside_an_initializer_body_aborts_construction_instead_of_returning_this() {
    let err = run(r#"class A { init() { this.x = 1 + "bad"; } } A();"#)
        .expect_err("a runtime error inside init must propagate, not be swallowed");
    assert_eq!(err.exit_code(), 70);
    assert!(
        err.to_string().contains("Operands must be two numbers or two strings."),
        "unexpected message: {err}"
    );
}

#[test]
fn setting_a_field_on_a_non_instance_reports_the_shared_properties_message() {
    let err = run(r#"var a = 1; a.x = 2;"#).expect_err("setting a field on a non-instance must fail");
    assert_eq!(err.exit_code(), 70);
    assert!(
        err.to_string().contains("Only instances have properties."),
        "unexpected message: {err}"
    );
}
