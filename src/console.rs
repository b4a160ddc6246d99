//! Human-facing output.
//!
//! The harness prints its `[producer]` / `[consumer]` lines to stdout, while
//! `tracing` diagnostics go to stderr. Both the publisher and the listener
//! write through a shared [`Console`] so tests can capture the exact text.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Cloneable, line-oriented writer shared by the publisher and the listener.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn stdout() -> Self {
        Self::from_writer(std::io::stdout())
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// A console backed by memory, plus a handle to read what was printed.
    pub fn capture() -> (Self, CapturedOutput) {
        let buffer = CapturedOutput::default();
        (Self::from_writer(buffer.clone()), buffer)
    }

    pub fn line(&self, text: &str) {
        // Output is best effort; a closed stdout must not abort the run.
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }

    /// A header line followed by a multi-line body, written atomically.
    pub fn block(&self, header: &str, body: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{header}\n{body}");
            let _ = out.flush();
        }
    }
}

/// In-memory sink returned by [`Console::capture`].
#[derive(Clone, Default)]
pub struct CapturedOutput {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Number of lines that start with `prefix`.
    pub fn count_lines_starting_with(&self, prefix: &str) -> usize {
        self.contents().lines().filter(|l| l.starts_with(prefix)).count()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut bytes) = self.bytes.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_and_blocks_are_captured() {
        let (console, output) = Console::capture();
        console.line("[producer] hello");
        console.block("[consumer] execution_report:", "{\n  \"a\": 1\n}");

        assert_eq!(
            output.contents(),
            "[producer] hello\n[consumer] execution_report:\n{\n  \"a\": 1\n}\n"
        );
        assert_eq!(output.count_lines_starting_with("[consumer]"), 1);
    }
}
