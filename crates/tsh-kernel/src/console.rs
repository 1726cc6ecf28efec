//! Where asynchronous job notices are written.
//!
//! The signal relay reports terminations and stops while the main flow may be
//! blocked elsewhere, so it cannot hand text back through an `ExecResult`.
//! Notices go to a shared console instead: stdout for the real shell, an
//! in-memory buffer for tests.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug)]
enum Sink {
    Stdout,
    Buffer(Vec<u8>),
}

/// Shared line-oriented output for relay notices.
#[derive(Debug, Clone)]
pub struct Console {
    sink: Arc<Mutex<Sink>>,
}

impl Console {
    /// Console writing to the process's stdout.
    pub fn stdout() -> Self {
        Self {
            sink: Arc::new(Mutex::new(Sink::Stdout)),
        }
    }

    /// Console capturing everything in memory.
    pub fn buffer() -> Self {
        Self {
            sink: Arc::new(Mutex::new(Sink::Buffer(Vec::new()))),
        }
    }

    /// Write one line, appending the newline, and flush.
    pub fn line(&self, text: impl AsRef<str>) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *sink {
            Sink::Stdout => {
                let mut out = std::io::stdout().lock();
                if let Err(e) = writeln!(out, "{}", text.as_ref()).and_then(|_| out.flush()) {
                    tracing::warn!("failed to write notice: {}", e);
                }
            }
            Sink::Buffer(buf) => {
                buf.extend_from_slice(text.as_ref().as_bytes());
                buf.push(b'\n');
            }
        }
    }

    /// Captured text so far. Always empty for a stdout console.
    pub fn contents(&self) -> String {
        let sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match &*sink {
            Sink::Stdout => String::new(),
            Sink::Buffer(buf) => String::from_utf8_lossy(buf).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_collects_lines() {
        let console = Console::buffer();
        let clone = console.clone();
        console.line("one");
        clone.line(String::from("two"));
        assert_eq!(console.contents(), "one\ntwo\n");
    }

    #[test]
    fn stdout_reports_nothing() {
        assert!(Console::stdout().contents().is_empty());
    }
}
