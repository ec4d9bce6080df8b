//! Pipeline error types.
//!
//! Each pipeline stage (scan, parse, resolve, evaluate) has its own leaf error type;
//! `LoxError` composes them via `From` impls, keeping parse/resolve/runtime failures
//! distinct so callers can report and recover accurately without string matching.

use std::fmt;

/// A lexical error: an unexpected character or an unterminated string.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.message)
    }
}

/// Where a parse error occurred, for the `Error<where>: msg` format.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorLocation {
    End,
    Token(String),
}

impl fmt::Display for ParseErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::End => write!(f, " at end"),
            Self::Token(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

/// A syntactic error raised by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub where_: ParseErrorLocation,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error{}: {}", self.line, self.where_, self.message)
    }
}

/// A static error raised by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.message)
    }
}

/// A runtime error raised while evaluating statements or expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.message)
    }
}

impl RuntimeError {
    #[must_use]
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Top-level error for a pipeline run, separating failures by stage.
///
/// Keeping scan/parse/resolve/runtime failures distinct lets callers (the CLI driver,
/// the REPL, tests) pick the correct exit code and report policy without string
/// matching on the message.
#[derive(Debug, Clone, PartialEq)]
pub enum LoxError {
    /// Scanning failed; one entry per lexical error encountered.
    Scan(Vec<ScanError>),
    /// Parsing failed; one entry per syntax error encountered (the parser synchronizes
    /// and keeps going, so there may be more than one).
    Parse(Vec<ParseError>),
    /// Static resolution failed; one entry per resolver error encountered.
    Resolve(Vec<ResolveError>),
    /// Evaluation raised a runtime error; exactly one, since evaluation aborts
    /// immediately at the first runtime error.
    Runtime(RuntimeError),
}

impl fmt::Display for LoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan(errors) => write_each(f, errors),
            Self::Parse(errors) => write_each(f, errors),
            Self::Resolve(errors) => write_each(f, errors),
            Self::Runtime(error) => write!(f, "{error}"),
        }
    }
}

fn write_each<T: fmt::Display>(f: &mut fmt::Formatter<'_>, errors: &[T]) -> fmt::Result {
    for (i, error) in errors.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        write!(f, "{error}")?;
    }
    Ok(())
}

impl std::error::Error for LoxError {}

impl LoxError {
    /// Process exit code this error maps to, per the CLI's `tokenize`/`parse`/
    /// `evaluate`/`run` exit-code contract.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Scan(_) | Self::Parse(_) | Self::Resolve(_) => 65,
            Self::Runtime(_) => 70,
        }
    }
}

impl From<Vec<ScanError>> for LoxError {
    fn from(errors: Vec<ScanError>) -> Self {
        Self::Scan(errors)
    }
}

impl From<Vec<ParseError>> for LoxError {
    fn from(errors: Vec<ParseError>) -> Self {
        Self::Parse(errors)
    }
}

impl From<Vec<ResolveError>> for LoxError {
    fn from(errors: Vec<ResolveError>) -> Self {
        Self::Resolve(errors)
    }
}

impl From<RuntimeError> for LoxError {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}
