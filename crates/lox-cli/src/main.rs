//! Thin CLI shell: parses `argv`, reads the script file (or stdin for the REPL
//! fallback), and hands off to the `lox` library crate's entry points. No business
//! logic lives here beyond argument handling and exit-code translation.

use std::{
    env, fs,
    io::{self, BufRead, Write as _},
    process::ExitCode,
};

use lox::{
    Interpreter, ReplSession, StdPrint,
    error::LoxError,
    lexer, parser, printer, resolver,
};

/// `sysexits.h`-style codes for the process exit status.
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_SOFTWARE: u8 = 70;
const EX_IOERR: u8 = 74;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let Some(command) = args.get(1).map(String::as_str) else {
        eprintln!("Usage: lox <tokenize|parse|evaluate|run> [script]");
        return ExitCode::from(EX_USAGE);
    };

    if !["tokenize", "parse", "evaluate", "run"].contains(&command) {
        eprintln!("Unknown command: {command}");
        return ExitCode::from(EX_USAGE);
    }

    match args.get(2) {
        Some(path) => run_file(command, path),
        None => run_prompt(command),
    }
}

fn run_file(command: &str, path: &str) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error reading {path}: {err}");
            return ExitCode::from(EX_IOERR);
        }
    };
    ExitCode::from(dispatch(command, &source))
}

/// Reads lines from stdin, printing `> ` before each prompt, and runs each one through
/// the same pipeline the file form of `command` would use. `run` keeps a single
/// [`ReplSession`] alive across lines so bindings persist; the other subcommands have
/// no meaningful cross-line state (they evaluate/print one expression or token stream
/// at a time) and so run a fresh pipeline per line.
fn run_prompt(command: &str) -> ExitCode {
    let mut session = (command == "run").then(|| ReplSession::new(Box::new(StdPrint)));
    let stdin = io::stdin();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                println!();
                break;
            }
            Ok(_) => {}
        }

        if let Some(session) = &mut session {
            if let Err(err) = session.execute(&line) {
                eprintln!("{err}");
            }
        } else {
            dispatch(command, &line);
        }
    }

    ExitCode::SUCCESS
}

/// Runs one source string through `command`'s pipeline, printing output/errors and
/// returning the matching process exit code.
fn dispatch(command: &str, source: &str) -> u8 {
    match command {
        "tokenize" => tokenize(source),
        "parse" => parse_expression(source),
        "evaluate" => evaluate(source),
        "run" => run(source),
        _ => unreachable!("command is validated in main"),
    }
}

fn tokenize(source: &str) -> u8 {
    let (tokens, errors) = lexer::scan(source);
    for token in &tokens {
        println!("{token}");
    }
    for error in &errors {
        eprintln!("{error}");
    }
    if errors.is_empty() { 0 } else { EX_DATAERR }
}

fn parse_expression(source: &str) -> u8 {
    let (tokens, scan_errors) = lexer::scan(source);
    if !scan_errors.is_empty() {
        for error in &scan_errors {
            eprintln!("{error}");
        }
        return EX_DATAERR;
    }

    let (expr, parse_errors) = parser::parse_expression(tokens);
    if !parse_errors.is_empty() {
        for error in &parse_errors {
            eprintln!("{error}");
        }
        return EX_DATAERR;
    }

    if let Some(expr) = expr {
        println!("{}", printer::print(&expr));
    }
    0
}

fn evaluate(source: &str) -> u8 {
    let (tokens, scan_errors) = lexer::scan(source);
    if !scan_errors.is_empty() {
        for error in &scan_errors {
            eprintln!("{error}");
        }
        return EX_DATAERR;
    }

    let (expr, parse_errors) = parser::parse_expression(tokens);
    if !parse_errors.is_empty() {
        for error in &parse_errors {
            eprintln!("{error}");
        }
        return EX_DATAERR;
    }
    let Some(expr) = expr else { return EX_DATAERR };

    let mut interpreter = Interpreter::with_stdout();
    match interpreter.interpret_expression(&expr) {
        Ok(value) => {
            println!("{}", value.stringify());
            0
        }
        Err(err) => {
            eprintln!("{err}");
            EX_SOFTWARE
        }
    }
}

fn run(source: &str) -> u8 {
    match run_pipeline(source) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            err.exit_code() as u8
        }
    }
}

fn run_pipeline(source: &str) -> Result<(), LoxError> {
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

    let mut interpreter = Interpreter::with_stdout();
    interpreter.set_depths(depths);
    interpreter.interpret(&statements).map_err(Into::into)
}
