//! jobs: List the job table.

use async_trait::async_trait;

use crate::error::ShellResult;
use crate::interpreter::{Eval, ExecResult};
use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Jobs tool: one line per job, ascending job id.
pub struct Jobs;

#[async_trait]
impl Tool for Jobs {
    fn name(&self) -> &str {
        "jobs"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("jobs", "List running and stopped jobs")
            .example("List jobs", "jobs")
    }

    async fn execute(&self, _args: ToolArgs, ctx: &ExecContext) -> ShellResult<Eval> {
        let mut out = String::new();
        for job in ctx.jobs.list() {
            out.push_str(&job.to_string());
            out.push('\n');
        }
        Ok(ExecResult::success(out).into())
    }
}
