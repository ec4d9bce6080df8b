//! Persistent interpreter session for the bare-invocation REPL.
//!
//! A single long-lived interpreter whose global environment survives across repeated
//! [`ReplSession::execute`] calls, so a variable or function defined on one input line
//! is visible on the next. Unlike snapshot-capable session designs there is no
//! fork/save-load support and no interactive external-function-call pause — this
//! language has no module system and no host callback surface.

use crate::{error::LoxError, interpreter::Interpreter, io::PrintWriter, lexer, parser, resolver};

pub struct ReplSession {
    interpreter: Interpreter,
}

impl ReplSession {
    #[must_use]
    pub fn new(output: Box<dyn PrintWriter>) -> Self {
        Self { interpreter: Interpreter::new(output) }
    }

    /// Runs one source snippet (one or more statements) through the full
    /// scan → parse → resolve → evaluate pipeline against this session's existing
    /// global environment.
    ///
    /// A runtime error from one call does not poison later calls: the environment
    /// chain above the failed statement is untouched, since only the failing
    /// statement (and anything nested inside it) ever ran.
    pub fn execute(&mut self, source: &str) -> Result<(), LoxError> {
        let (tokens, scan_errors) = lexer::scan(source);
        if !scan_errors.is_empty() {
            return Err(scan_errors.into());
        }

        let (statements, parse_errors) = parser::parse(tokens);
        if !parse_errors.is_empty() {
            return Err(parse_errors.into());
        }

        let (depths, resolve_errors) = resolver::resolve(&statements);
        if !resolve_errors.is_empty() {
            return Err(resolve_errors.into());
        }

        self.interpreter.set_depths(depths);
        self.interpreter.interpret(&statements).map_err(Into::into)
    }
}
