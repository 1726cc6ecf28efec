//! Execution context for tools.

use std::sync::Arc;

use crate::scheduler::JobControl;

/// Execution context passed to tools.
#[derive(Clone)]
pub struct ExecContext {
    /// Shared job table.
    pub jobs: Arc<JobControl>,
}

impl ExecContext {
    /// Create a context over the given job control.
    pub fn new(jobs: Arc<JobControl>) -> Self {
        Self { jobs }
    }
}
