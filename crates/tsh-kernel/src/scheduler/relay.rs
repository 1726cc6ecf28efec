//! Signal relay: turns kernel notifications into job table updates.
//!
//! The shell's signal dispositions are replaced by tokio signal streams, and a
//! single task consumes them. Each notification runs one bounded, synchronous
//! step on [`JobControl`]:
//!
//! | signal  | step |
//! |---------|------|
//! | SIGCHLD | [`JobControl::reap_children`] |
//! | SIGINT  | [`JobControl::interrupt_foreground`] |
//! | SIGTSTP | [`JobControl::stop_foreground`] |
//! | SIGQUIT | report and exit the shell |
//!
//! Signals of one kind that arrive while a step is running coalesce into a
//! single wakeup, which is fine because reaping drains every pending child.

use std::sync::Arc;

use nix::sys::signal::Signal;
use tokio::signal::unix::{signal, Signal as SignalStream, SignalKind};
use tokio::task::JoinHandle;

use super::job::JobControl;
use crate::error::{ShellError, ShellResult};

/// Message printed when the shell is told to quit by SIGQUIT.
pub const SIGQUIT_NOTICE: &str = "Terminating after receipt of SIGQUIT signal";

/// Installed signal streams bound to a job table.
pub struct SignalRelay {
    jobs: Arc<JobControl>,
    child: SignalStream,
    interrupt: SignalStream,
    stop: SignalStream,
    quit: SignalStream,
}

impl SignalRelay {
    /// Install handlers for SIGCHLD, SIGINT, SIGTSTP and SIGQUIT.
    ///
    /// Must be called inside a tokio runtime. From this point on the shell
    /// process itself no longer stops or dies on keyboard signals.
    pub fn install(jobs: Arc<JobControl>) -> ShellResult<Self> {
        Ok(Self {
            jobs,
            child: signal(SignalKind::child())?,
            interrupt: signal(SignalKind::interrupt())?,
            stop: signal(SignalKind::from_raw(Signal::SIGTSTP as i32))?,
            quit: signal(SignalKind::quit())?,
        })
    }

    /// Run the relay on the current runtime.
    ///
    /// A fatal error is recorded on the job table, which releases anyone
    /// waiting on the foreground job.
    pub fn spawn(self) -> JoinHandle<()> {
        let jobs = self.jobs.clone();
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                jobs.fail(e.to_string());
            }
        })
    }

    async fn run(mut self) -> ShellResult<()> {
        // Children may have changed state before the handlers existed.
        self.jobs.reap_children()?;

        loop {
            tokio::select! {
                received = self.child.recv() => {
                    closed(received, "SIGCHLD")?;
                    self.jobs.reap_children()?;
                }
                received = self.interrupt.recv() => {
                    closed(received, "SIGINT")?;
                    if let Some(pid) = self.jobs.interrupt_foreground()? {
                        tracing::debug!("forwarded SIGINT to group {}", pid);
                    }
                }
                received = self.stop.recv() => {
                    closed(received, "SIGTSTP")?;
                    if let Some(pid) = self.jobs.stop_foreground()? {
                        tracing::debug!("forwarded SIGTSTP to group {}", pid);
                    }
                }
                received = self.quit.recv() => {
                    closed(received, "SIGQUIT")?;
                    self.jobs.console().line(SIGQUIT_NOTICE);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn closed(received: Option<()>, name: &str) -> ShellResult<()> {
    received.ok_or_else(|| ShellError::RelayDown(format!("{} stream closed", name)))
}
