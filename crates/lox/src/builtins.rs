//! Native callables installed into the global environment before any user code runs.
//!
//! Only `clock` exists today, returning wall-clock seconds as a 64-bit float. This
//! module is kept separate from [`crate::environment`] so new natives can be added in
//! one place without touching the interpreter's construction logic.

use std::{
    rc::Rc,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    environment::EnvRef,
    value::{Callable, NativeFunction, Value},
};

/// Defines every native callable in `globals`. Called once, when an [`crate::interpreter::Interpreter`] is
/// constructed.
pub fn install(globals: &EnvRef) {
    globals.define("clock", Value::Callable(Callable::Native(Rc::new(clock()))));
}

fn clock() -> NativeFunction {
    NativeFunction {
        name: "clock",
        arity: 0,
        func: Box::new(|_args| {
            let seconds = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0.0, |d| d.as_secs_f64());
            Value::Number(seconds)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;

    #[test]
    fn clock_is_defined_and_callable_with_no_args() {
        let globals = Environment::root();
        install(&globals);
        let Value::Callable(callable) = globals.get("clock").unwrap() else {
            panic!("clock must be a callable");
        };
        assert_eq!(callable.arity(), 0);
    }
}
