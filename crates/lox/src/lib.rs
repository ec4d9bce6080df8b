//! A tree-walking interpreter for a small dynamically-typed language in the Lox
//! family: scanner → recursive-descent parser → lexical-scope resolver → evaluator.
//!
//! The pipeline stages are deliberately separate modules with narrow contracts
//! between them (token stream, AST, resolver side-table) rather than one combined
//! pass, so each stage can be tested and reasoned about independently:
//!
//! - [`lexer`] turns source text into a [`token::Token`] stream.
//! - [`parser`] turns tokens into an [`ast::Stmt`] list (or a single [`ast::Expr`] for
//!   the `parse`/`evaluate` CLI subcommands).
//! - [`resolver`] walks the AST once and records, for every variable/assignment/
//!   `this`/`super` occurrence, the lexical depth to its declaring scope.
//! - [`interpreter`] walks statements and expressions against an [`environment`] chain,
//!   using the resolver's side-table for O(1) variable access.
//!
//! [`repl`] composes all four into a persistent session for interactive use; [`printer`]
//! is a separate debugging visitor used by the `parse` subcommand.

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod io;
pub mod lexer;
pub mod numeric;
pub mod parser;
pub mod printer;
pub mod repl;
pub mod resolver;
pub mod token;
pub mod value;

pub use error::LoxError;
pub use interpreter::Interpreter;
pub use io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint};
pub use repl::ReplSession;
