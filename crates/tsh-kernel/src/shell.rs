//! The Shell: evaluates command lines against the job table.
//!
//! This is the control-flow coordinator: it dispatches built-ins, launches
//! programs, and for foreground jobs blocks until the signal relay removes or
//! demotes them. It owns the relay task for its lifetime.

use std::sync::Arc;

use nix::unistd::Pid;
use tokio::task::JoinHandle;
use tsh_types::JobState;

use crate::config::ShellConfig;
use crate::console::Console;
use crate::error::{ShellError, ShellResult};
use crate::interpreter::{Eval, ExecResult};
use crate::parser::parse_line;
use crate::scheduler::{launch, JobControl, Launch, SignalRelay};
use crate::tools::{register_builtins, ExecContext, ToolArgs, ToolRegistry};

/// Exit code reported when a program cannot be executed.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit code reported when no process could be created.
pub const EXIT_SPAWN_FAILED: i32 = 126;

/// A job-control shell bound to the current tokio runtime.
pub struct Shell {
    config: ShellConfig,
    jobs: Arc<JobControl>,
    tools: ToolRegistry,
    ctx: ExecContext,
    relay: Option<JoinHandle<()>>,
}

impl Shell {
    /// Create a shell printing job notices to stdout.
    ///
    /// Must be called inside a tokio runtime: this installs the shell's
    /// SIGCHLD, SIGINT, SIGTSTP and SIGQUIT handlers and starts the relay.
    pub fn new(config: ShellConfig) -> ShellResult<Self> {
        Self::with_console(config, Console::stdout())
    }

    /// Create a shell printing job notices to `console`.
    pub fn with_console(config: ShellConfig, console: Console) -> ShellResult<Self> {
        let jobs = Arc::new(JobControl::new(
            config.max_jobs,
            config.max_job_id,
            console,
        ));
        let relay = SignalRelay::install(jobs.clone())?.spawn();

        let mut tools = ToolRegistry::new();
        register_builtins(&mut tools);

        tracing::debug!(
            "shell ready: {} job slots, job ids up to {}",
            config.max_jobs,
            config.max_job_id
        );

        Ok(Self {
            config,
            ctx: ExecContext::new(jobs.clone()),
            jobs,
            tools,
            relay: Some(relay),
        })
    }

    /// The configuration this shell was built with.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Read access to the job table.
    pub fn jobs(&self) -> &Arc<JobControl> {
        &self.jobs
    }

    /// Fail if the signal relay has stopped.
    pub fn check(&self) -> ShellResult<()> {
        if let Some(reason) = self.jobs.fatal() {
            return Err(ShellError::RelayDown(reason));
        }
        if self.relay.as_ref().map_or(true, JoinHandle::is_finished) {
            return Err(ShellError::RelayDown("relay task exited".to_string()));
        }
        Ok(())
    }

    /// Evaluate one raw command line.
    ///
    /// Bad input, unknown programs and failed process creation come back as
    /// failed results; only errors that leave the job table untrustworthy are
    /// returned as `Err`.
    pub async fn eval(&self, line: &str) -> ShellResult<Eval> {
        self.check()?;

        let line = line.trim_end_matches(['\n', '\r']);
        let parsed = match parse_line(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                let msg = format!("tsh: {} at column {}", e.value, e.span.start + 1);
                return Ok(ExecResult::failure(2, msg).into());
            }
        };
        if parsed.is_empty() {
            return Ok(ExecResult::success("").into());
        }

        if let Some(eval) = self.builtin_cmd(&parsed.argv).await? {
            return Ok(eval);
        }

        let state = if parsed.background {
            JobState::Background
        } else {
            JobState::Foreground
        };

        let result = match launch(&self.jobs, &parsed.argv, line, state)? {
            Launch::Started(job) if parsed.background => ExecResult::success(format!("{}\n", job_banner(&job))),
            Launch::Started(job) => {
                self.waitfg(Pid::from_raw(job.pid)).await?;
                ExecResult::success("")
            }
            Launch::NotFound => ExecResult::failure(
                EXIT_NOT_FOUND,
                format!("{}: Command not found", parsed.argv[0]),
            ),
            Launch::SpawnFailed(e) => {
                ExecResult::failure(EXIT_SPAWN_FAILED, format!("fork error: {}", e))
            }
            Launch::Rejected(e) => ExecResult::failure(1, e.to_string()),
        };
        Ok(result.into())
    }

    /// Run `argv` as a built-in if it names one.
    ///
    /// Returns `None` when `argv[0]` is not a built-in and should be launched.
    pub async fn builtin_cmd(&self, argv: &[String]) -> ShellResult<Option<Eval>> {
        let Some(tool) = argv.first().and_then(|name| self.tools.get(name)) else {
            return Ok(None);
        };
        let eval = tool.execute(ToolArgs::from_argv(argv), &self.ctx).await?;
        Ok(Some(eval))
    }

    /// Block until `pid` no longer holds the foreground slot.
    pub async fn waitfg(&self, pid: Pid) -> ShellResult<()> {
        self.jobs.wait_foreground(pid).await
    }

    /// Stop the relay and wait for it to finish.
    ///
    /// Children keep running; nothing reaps them afterwards.
    pub async fn shutdown(mut self) {
        if let Some(relay) = self.relay.take() {
            relay.abort();
            if let Err(e) = relay.await {
                if !e.is_cancelled() {
                    tracing::warn!("relay ended abnormally: {}", e);
                }
            }
        }
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        if let Some(relay) = self.relay.take() {
            relay.abort();
        }
    }
}

/// `[<jid>] (<pid>) <command_line>`, echoed when a job starts in the background.
fn job_banner(job: &tsh_types::JobInfo) -> String {
    format!("[{}] ({}) {}", job.id, job.pid, job.command)
}
