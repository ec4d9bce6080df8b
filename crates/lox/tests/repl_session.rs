//! Integration tests for `ReplSession`: state persisting across separate `execute()`
//! calls, the way a line-by-line interactive session behaves.

use lox::{CollectStringPrint, ReplSession, StdPrint};

#[test]
fn a_variable_defined_in_one_call_is_visible_in_a_later_call() {
    let writer = CollectStringPrint::new();
    let lines = writer.lines();
    let mut session = ReplSession::new(Box::new(writer));

    session.execute("var greeting = \"hi\";").unwrap();
    session.execute("print greeting;").unwrap();

    assert_eq!(*lines.borrow(), vec!["hi".to_owned()]);
}

#[test]
fn a_function_defined_in_one_call_can_be_called_in_a_later_call() {
    let writer = CollectStringPrint::new();
    let lines = writer.lines();
    let mut session = ReplSession::new(Box::new(writer));

    session.execute("fun square(n) { return n * n; }").unwrap();
    session.execute("print square(5);").unwrap();

    assert_eq!(*lines.borrow(), vec!["25".to_owned()]);
}

#[test]
fn a_class_defined_in_one_call_can_be_instantiated_in_a_later_call() {
    let writer = CollectStringPrint::new();
    let lines = writer.lines();
    let mut session = ReplSession::new(Box::new(writer));

    session.execute("class Greeter { hello() { print \"hello\"; } }").unwrap();
    session.execute("Greeter().hello();").unwrap();

    assert_eq!(*lines.borrow(), vec!["hello".to_owned()]);
}

#[test]
fn a_runtime_error_in_one_call_does_not_poison_later_calls_on_the_same_session() {
    let writer = CollectStringPrint::new();
    let lines = writer.lines();
    let mut session = ReplSession::new(Box::new(writer));

    session.execute("var a = 1;").unwrap();
    assert!(session.execute("print undefined_name;").is_err());
    session.execute("print a;").unwrap();

    assert_eq!(*lines.borrow(), vec!["1".to_owned()]);
}

#[test]
fn a_session_can_be_built_against_stdout_without_panicking() {
    let _session = ReplSession::new(Box::new(StdPrint));
}
