//! fg: Continue a job in the foreground and wait for it.

use async_trait::async_trait;
use tsh_types::JobState;

use super::job_spec::resolve;
use crate::error::ShellResult;
use crate::interpreter::{Eval, ExecResult};
use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Fg tool: resume a stopped or background job in the foreground.
pub struct Fg;

#[async_trait]
impl Tool for Fg {
    fn name(&self) -> &str {
        "fg"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("fg", "Continue a job in the foreground and wait for it")
            .usage("<pid|%jobid>")
            .example("Resume job 1", "fg %1")
            .example("Resume by process id", "fg 4242")
    }

    async fn execute(&self, args: ToolArgs, ctx: &ExecContext) -> ShellResult<Eval> {
        let job = match resolve(&ctx.jobs, "fg", args.get_positional(0)) {
            Ok(job) => job,
            Err(result) => return Ok(result.into()),
        };

        if !ctx.jobs.continue_job(job.pid, JobState::Foreground)? {
            return Ok(ExecResult::failure(1, format!("({}): No such process", job.pid)).into());
        }
        ctx.jobs.wait_foreground(job.pid).await?;
        Ok(ExecResult::success("").into())
    }
}
