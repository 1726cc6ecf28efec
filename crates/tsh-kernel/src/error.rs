//! Error types for the job-control core.
//!
//! Only failures that threaten the job table's integrity are errors here.
//! Per-command problems (bad `fg` argument, unknown program) are reported
//! through [`ExecResult`](crate::interpreter::ExecResult) and never escape
//! [`Shell::eval`](crate::Shell::eval).

use nix::errno::Errno;
use thiserror::Error;

use crate::scheduler::TableError;

/// Unrecoverable shell failure. The binary exits when one reaches it.
#[derive(Debug, Error)]
pub enum ShellError {
    /// An OS primitive (wait, signal delivery) failed unexpectedly.
    #[error("{context}: {source}")]
    Os {
        context: &'static str,
        #[source]
        source: Errno,
    },

    /// The signal relay stopped after a fatal error.
    #[error("signal relay stopped: {0}")]
    RelayDown(String),

    /// The job table rejected an internal update.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Installing signal handlers or another I/O setup step failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Wrap an errno with the name of the primitive that produced it.
    pub fn os(context: &'static str, source: Errno) -> Self {
        ShellError::Os { context, source }
    }
}

/// Result alias for the job-control core.
pub type ShellResult<T> = Result<T, ShellError>;
