//! ExecResult: the structured result of every command line.
//!
//! Built-ins and launch diagnostics return text here instead of printing, so
//! the read loop decides where it goes. Asynchronous job notices do not pass
//! through here; see [`Console`](crate::console::Console).

/// The result of evaluating one command line.
///
/// - `code`: exit code (0 = success, 127 = command not found)
/// - `out`: output lines, each newline-terminated
/// - `err`: diagnostic message for the user, without trailing newline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit code. 0 means success.
    pub code: i32,
    /// Output text.
    pub out: String,
    /// Diagnostic text.
    pub err: String,
}

impl ExecResult {
    /// Create a successful result with output.
    pub fn success(out: impl Into<String>) -> Self {
        Self {
            code: 0,
            out: out.into(),
            err: String::new(),
        }
    }

    /// Create a failed result with a diagnostic.
    pub fn failure(code: i32, err: impl Into<String>) -> Self {
        Self {
            code,
            out: String::new(),
            err: err.into(),
        }
    }

    /// True if the exit code is 0.
    pub fn ok(&self) -> bool {
        self.code == 0
    }
}

/// Outcome of [`Shell::eval`](crate::Shell::eval).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eval {
    /// Keep reading lines.
    Continue(ExecResult),
    /// `quit` was entered: show the farewell, then terminate without
    /// touching children.
    Quit(ExecResult),
}

impl Eval {
    /// The command result.
    pub fn result(&self) -> &ExecResult {
        match self {
            Eval::Continue(result) | Eval::Quit(result) => result,
        }
    }

    /// True when the read loop should stop after showing the result.
    pub fn is_quit(&self) -> bool {
        matches!(self, Eval::Quit(_))
    }
}

impl From<ExecResult> for Eval {
    fn from(result: ExecResult) -> Self {
        Eval::Continue(result)
    }
}
