//! Standalone interactive REPL binary.
//!
//! With a file argument, reads and runs the whole file through a single
//! [`ReplSession`]; with no argument, reads lines from stdin, buffering until braces
//! balance so a multi-line `fun`/`class`/block can be typed across several lines
//! before it is executed.

use std::{
    io::{self, Write as _},
    process::ExitCode,
};

use lox::{ReplSession, StdPrint};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if let Some(path) = args.get(1) {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("Error reading {path}: {err}");
                return ExitCode::FAILURE;
            }
        };
        let mut session = ReplSession::new(Box::new(StdPrint));
        if let Err(err) = session.execute(&source) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    let mut session = ReplSession::new(Box::new(StdPrint));
    let mut source = String::new();

    loop {
        let prompt = if source.is_empty() { "> " } else { ". " };
        let Some(line) = read_line(prompt) else {
            println!();
            break;
        };

        if source.is_empty() && line.trim().is_empty() {
            continue;
        }

        if !source.is_empty() {
            source.push('\n');
        }
        source.push_str(&line);

        if needs_more_input(&source) {
            continue;
        }

        if let Err(err) = session.execute(&source) {
            eprintln!("{err}");
        }
        source.clear();
    }

    ExitCode::SUCCESS
}

/// Buffers input while braces/parens/brackets are unbalanced, so a function or class
/// body can span multiple lines before being handed to the parser.
fn needs_more_input(source: &str) -> bool {
    let mut balance = 0i32;
    for ch in source.chars() {
        match ch {
            '(' | '[' | '{' => balance += 1,
            ')' | ']' | '}' => balance -= 1,
            _ => {}
        }
    }
    balance > 0
}

/// Reads one line from stdin after printing `prompt`. Returns `None` on EOF.
fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    if io::stdout().flush().is_err() {
        return None;
    }
    let mut input = String::new();
    let read = io::stdin().read_line(&mut input).ok()?;
    if read == 0 {
        return None;
    }
    Some(input.trim_end_matches(['\r', '\n']).to_owned())
}
