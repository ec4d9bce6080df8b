//! Output abstraction for `print` statements.
//!
//! The interpreter never writes to `stdout` directly — it holds a `Box<dyn
//! PrintWriter>` instead, so tests and the REPL can capture output without touching
//! the real process streams.

use std::{cell::RefCell, rc::Rc};

/// Receives one line of `print` output at a time, without a separator or trailing
/// newline of its own — the caller (the interpreter) is responsible for one call per
/// `print` statement.
pub trait PrintWriter {
    fn print_line(&mut self, line: &str);
}

/// Writes straight to `stdout`, used by the CLI binaries.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn print_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Collects every printed line into an in-memory buffer, used by tests and by the
/// REPL session (which needs to show output alongside each evaluated line without
/// letting it interleave unpredictably with prompt text).
///
/// The buffer itself lives behind a shared `Rc<RefCell<_>>` rather than inline, so a
/// caller can keep a [`CollectStringPrint::lines`] handle to read back what was
/// printed after handing ownership of the writer itself to an `Interpreter`.
#[derive(Debug, Default, Clone)]
pub struct CollectStringPrint {
    lines: Rc<RefCell<Vec<String>>>,
}

impl CollectStringPrint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A cheap clone of the shared handle backing this writer's buffer, so the caller
    /// can read (or drain) it after moving the writer elsewhere.
    #[must_use]
    pub fn lines(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.lines)
    }

    /// Drains and returns everything printed so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut self.lines.borrow_mut())
    }
}

impl PrintWriter for CollectStringPrint {
    fn print_line(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_owned());
    }
}

/// Discards everything printed. Useful for benchmarking or fuzzing the interpreter
/// without paying for output allocation.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn print_line(&mut self, _line: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_string_print_captures_lines_in_order() {
        let mut writer = CollectStringPrint::new();
        writer.print_line("a");
        writer.print_line("b");
        assert_eq!(writer.take(), vec!["a", "b"]);
        assert!(writer.take().is_empty());
    }

    #[test]
    fn collect_string_print_handle_observes_writes_through_a_moved_writer() {
        let writer = CollectStringPrint::new();
        let handle = writer.lines();
        let mut boxed: Box<dyn PrintWriter> = Box::new(writer);
        boxed.print_line("hello");
        assert_eq!(*handle.borrow(), vec!["hello".to_owned()]);
    }

    #[test]
    fn no_print_discards_everything() {
        let mut writer = NoPrint;
        writer.print_line("anything");
    }
}
