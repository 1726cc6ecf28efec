//! bg: Continue a job in the background.

use async_trait::async_trait;
use tsh_types::JobState;

use super::job_spec::resolve;
use crate::error::ShellResult;
use crate::interpreter::{Eval, ExecResult};
use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Bg tool: resume a stopped job without waiting for it. Prints nothing.
pub struct Bg;

#[async_trait]
impl Tool for Bg {
    fn name(&self) -> &str {
        "bg"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("bg", "Continue a stopped job in the background")
            .usage("<pid|%jobid>")
            .example("Resume job 1", "bg %1")
            .example("Resume by process id", "bg 4242")
    }

    async fn execute(&self, args: ToolArgs, ctx: &ExecContext) -> ShellResult<Eval> {
        let job = match resolve(&ctx.jobs, "bg", args.get_positional(0)) {
            Ok(job) => job,
            Err(result) => return Ok(result.into()),
        };

        if !ctx.jobs.continue_job(job.pid, JobState::Background)? {
            return Ok(ExecResult::failure(1, format!("({}): No such process", job.pid)).into());
        }
        Ok(ExecResult::success("").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Console;
    use crate::scheduler::JobControl;
    use nix::unistd::Pid;
    use std::sync::Arc;

    // Far above any real pid_max, so SIGCONT fails with ESRCH.
    const GONE: i32 = 99_999_999;

    fn make_ctx() -> ExecContext {
        ExecContext::new(Arc::new(JobControl::new(8, 100, Console::buffer())))
    }

    fn args(positional: &[&str]) -> ToolArgs {
        ToolArgs {
            name: "bg".to_string(),
            positional: positional.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_bg_without_argument() {
        let ctx = make_ctx();
        let eval = Bg.execute(args(&[]), &ctx).await.unwrap();
        let result = eval.result();
        assert!(!result.ok());
        assert_eq!(result.err, "bg command requires PID or %jobid argument");
    }

    #[tokio::test]
    async fn test_bg_marks_stopped_job_running() {
        let ctx = make_ctx();
        let pid = Pid::from_raw(GONE);
        {
            let mut table = ctx.jobs.lock();
            table.add(pid, JobState::Foreground, "sleep 30").unwrap();
            table.set_state(pid, JobState::Stopped).unwrap();
        }

        let eval = Bg.execute(args(&["%1"]), &ctx).await.unwrap();
        let result = eval.result();
        assert!(result.ok());
        assert!(result.out.is_empty());
        assert_eq!(ctx.jobs.lookup_by_pid(pid).unwrap().state, JobState::Background);
        assert_eq!(ctx.jobs.foreground_pid(), None);
    }

    #[tokio::test]
    async fn test_bg_unknown_job() {
        let ctx = make_ctx();
        let eval = Bg.execute(args(&["%3"]), &ctx).await.unwrap();
        assert_eq!(eval.result().err, "%3: No such job");
    }
}
