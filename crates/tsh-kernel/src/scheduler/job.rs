//! Shared job-control state.
//!
//! [`JobControl`] is the single owner of the [`JobTable`]. The main flow
//! (launcher, built-ins) and the signal relay both go through it, so every
//! read and write happens under one mutex and never observes a half-updated
//! job. Each time a lock is released the current foreground pid is published
//! on a watch channel, which is what [`JobControl::wait_foreground`] blocks on.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tokio::sync::watch;
use tsh_types::{JobId, JobInfo, JobState};

use super::table::{Job, JobTable};
use crate::console::Console;
use crate::error::{ShellError, ShellResult};

/// Exclusive access to the job table.
///
/// Dropping the guard publishes the foreground pid if it changed.
pub struct TableGuard<'a> {
    table: MutexGuard<'a, JobTable>,
    foreground: &'a watch::Sender<Option<Pid>>,
}

impl Deref for TableGuard<'_> {
    type Target = JobTable;

    fn deref(&self) -> &JobTable {
        &self.table
    }
}

impl DerefMut for TableGuard<'_> {
    fn deref_mut(&mut self) -> &mut JobTable {
        &mut self.table
    }
}

impl Drop for TableGuard<'_> {
    fn drop(&mut self) {
        let now = self.table.foreground_pid();
        self.foreground.send_if_modified(|published| {
            if *published != now {
                *published = now;
                true
            } else {
                false
            }
        });
    }
}

/// Job table plus the notification plumbing around it.
pub struct JobControl {
    table: Mutex<JobTable>,
    foreground: watch::Sender<Option<Pid>>,
    fatal: Mutex<Option<String>>,
    console: Console,
}

impl JobControl {
    /// Create job control with the given table geometry.
    pub fn new(max_jobs: usize, max_job_id: u32, console: Console) -> Self {
        let (foreground, _) = watch::channel(None);
        Self {
            table: Mutex::new(JobTable::new(max_jobs, max_job_id)),
            foreground,
            fatal: Mutex::new(None),
            console,
        }
    }

    /// Lock the table. Keep the guard short-lived and never hold it across
    /// an `.await`.
    pub fn lock(&self) -> TableGuard<'_> {
        TableGuard {
            table: self.table.lock().unwrap_or_else(PoisonError::into_inner),
            foreground: &self.foreground,
        }
    }

    /// Console used for asynchronous notices.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// All live jobs ordered by job id.
    pub fn list(&self) -> Vec<JobInfo> {
        self.lock().list()
    }

    /// Copy of the job led by `pid`.
    pub fn lookup_by_pid(&self, pid: Pid) -> Option<Job> {
        self.lock().lookup_by_pid(pid).cloned()
    }

    /// Copy of the job with id `id`.
    pub fn lookup_by_jid(&self, id: JobId) -> Option<Job> {
        self.lock().lookup_by_jid(id).cloned()
    }

    /// Pid of the current foreground job.
    pub fn foreground_pid(&self) -> Option<Pid> {
        self.lock().foreground_pid()
    }

    /// Job id of the job led by `pid`.
    pub fn pid_to_jid(&self, pid: Pid) -> Option<JobId> {
        self.lock().pid_to_jid(pid)
    }

    /// Reap every child whose status changed, without blocking.
    ///
    /// Exited children are removed silently, killed children are reported and
    /// removed, stopped children are reported and marked stopped. Statuses for
    /// pids the table does not know are ignored.
    pub fn reap_children(&self) -> ShellResult<()> {
        let mut table = self.lock();
        loop {
            let flags = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED;
            match waitpid(Pid::from_raw(-1), Some(flags)) {
                Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => return Ok(()),
                Ok(WaitStatus::Exited(pid, code)) => {
                    tracing::debug!("child {} exited with status {}", pid, code);
                    table.remove(pid);
                }
                Ok(WaitStatus::Signaled(pid, signal, _core)) => {
                    if let Some(id) = table.pid_to_jid(pid) {
                        self.console.line(terminated_notice(id, pid, signal));
                    }
                    table.remove(pid);
                }
                Ok(WaitStatus::Stopped(pid, signal)) => {
                    let Some(job) = table.lookup_by_pid(pid) else {
                        continue;
                    };
                    // The keyboard-stop path already reported and marked it.
                    if job.state != JobState::Stopped {
                        self.console.line(stopped_notice(job.id, pid, signal));
                        table.set_state(pid, JobState::Stopped)?;
                    }
                }
                Ok(other) => {
                    tracing::debug!("ignoring child status {:?}", other);
                }
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(ShellError::os("waitpid", e)),
            }
        }
    }

    /// Forward a keyboard interrupt to the foreground job's process group.
    ///
    /// The job stays in the table; removal waits for the child status
    /// notification confirming it actually died. Returns the signalled pid.
    pub fn interrupt_foreground(&self) -> ShellResult<Option<Pid>> {
        let table = self.lock();
        let Some(pid) = table.foreground_pid() else {
            return Ok(None);
        };
        signal_group(pid, Signal::SIGINT)?;
        Ok(Some(pid))
    }

    /// Suspend the foreground job.
    ///
    /// The job is reported and marked stopped before the stop request is
    /// sent, so the table never reads foreground for a stopped job. Returns
    /// the stopped pid.
    pub fn stop_foreground(&self) -> ShellResult<Option<Pid>> {
        let mut table = self.lock();
        let Some(job) = table.foreground().cloned() else {
            return Ok(None);
        };
        self.console
            .line(stopped_notice(job.id, job.pid, Signal::SIGTSTP));
        table.set_state(job.pid, JobState::Stopped)?;
        signal_group(job.pid, Signal::SIGTSTP)?;
        Ok(Some(job.pid))
    }

    /// Send SIGCONT to a job's process group and move it to `state`.
    ///
    /// Both steps happen under one lock, so the relay cannot remove the job
    /// between them. Returns false if the job had already disappeared.
    pub fn continue_job(&self, pid: Pid, state: JobState) -> ShellResult<bool> {
        let mut table = self.lock();
        if table.lookup_by_pid(pid).is_none() {
            return Ok(false);
        }
        signal_group(pid, Signal::SIGCONT)?;
        table.set_state(pid, state)?;
        Ok(true)
    }

    /// Block until `pid` no longer holds the foreground slot.
    pub async fn wait_foreground(&self, pid: Pid) -> ShellResult<()> {
        let mut rx = self.foreground.subscribe();
        loop {
            if let Some(reason) = self.fatal() {
                return Err(ShellError::RelayDown(reason));
            }
            if *rx.borrow_and_update() != Some(pid) {
                return Ok(());
            }
            if rx.changed().await.is_err() {
                return Err(ShellError::RelayDown("job control dropped".to_string()));
            }
        }
    }

    /// Record a fatal relay error and wake every waiter.
    pub fn fail(&self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::error!("job control failed: {}", reason);
        *self.fatal.lock().unwrap_or_else(PoisonError::into_inner) = Some(reason);
        self.foreground.send_modify(|_| {});
    }

    /// The fatal error recorded by the relay, if any.
    pub fn fatal(&self) -> Option<String> {
        self.fatal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Deliver `signal` to the whole process group led by `pid`.
///
/// A group that no longer exists has simply finished; that is not an error.
pub fn signal_group(pid: Pid, signal: Signal) -> ShellResult<()> {
    match killpg(pid, signal) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => {
            tracing::debug!("process group {} already gone ({})", pid, signal);
            Ok(())
        }
        Err(e) => Err(ShellError::os("killpg", e)),
    }
}

/// `Job [<jid>] (<pid>) terminated by signal <n>`
pub fn terminated_notice(id: JobId, pid: Pid, signal: Signal) -> String {
    format!("Job [{}] ({}) terminated by signal {}", id, pid, signal as i32)
}

/// `Job [<jid>] (<pid>) Stopped by signal <n>`
pub fn stopped_notice(id: JobId, pid: Pid, signal: Signal) -> String {
    format!("Job [{}] ({}) Stopped by signal {}", id, pid, signal as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn control() -> JobControl {
        JobControl::new(4, 100, Console::buffer())
    }

    #[test]
    fn notice_layout() {
        let pid = Pid::from_raw(77);
        assert_eq!(
            terminated_notice(JobId(2), pid, Signal::SIGINT),
            "Job [2] (77) terminated by signal 2"
        );
        assert_eq!(
            stopped_notice(JobId(2), pid, Signal::SIGTSTP),
            format!("Job [2] (77) Stopped by signal {}", Signal::SIGTSTP as i32)
        );
    }

    #[test]
    fn interrupt_and_stop_without_foreground_are_noops() {
        let jobs = control();
        assert_eq!(jobs.interrupt_foreground().unwrap(), None);
        assert_eq!(jobs.stop_foreground().unwrap(), None);
        assert!(jobs.console().contents().is_empty());
    }

    #[test]
    fn continue_unknown_job_reports_gone() {
        let jobs = control();
        assert!(!jobs.continue_job(Pid::from_raw(4_000_000), JobState::Background).unwrap());
    }

    #[tokio::test]
    async fn wait_returns_when_not_foreground() {
        let jobs = control();
        jobs.lock()
            .add(Pid::from_raw(50), JobState::Background, "bg &")
            .unwrap();
        jobs.wait_foreground(Pid::from_raw(50)).await.unwrap();
    }

    #[tokio::test]
    async fn wait_wakes_on_removal() {
        let jobs = Arc::new(control());
        let pid = Pid::from_raw(51);
        jobs.lock().add(pid, JobState::Foreground, "fg").unwrap();

        let waiter = {
            let jobs = jobs.clone();
            tokio::spawn(async move { jobs.wait_foreground(pid).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        jobs.lock().remove(pid);
        let result = tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn wait_wakes_on_demotion() {
        let jobs = Arc::new(control());
        let pid = Pid::from_raw(52);
        jobs.lock().add(pid, JobState::Foreground, "fg").unwrap();

        let waiter = {
            let jobs = jobs.clone();
            tokio::spawn(async move { jobs.wait_foreground(pid).await })
        };
        jobs.lock().set_state(pid, JobState::Stopped).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(result.is_ok());
        assert_eq!(jobs.lookup_by_pid(pid).unwrap().state, JobState::Stopped);
    }

    #[tokio::test]
    async fn fatal_error_releases_waiters() {
        let jobs = Arc::new(control());
        let pid = Pid::from_raw(53);
        jobs.lock().add(pid, JobState::Foreground, "fg").unwrap();

        let waiter = {
            let jobs = jobs.clone();
            tokio::spawn(async move { jobs.wait_foreground(pid).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        jobs.fail("waitpid: EINVAL");

        let result = tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(matches!(result, Err(ShellError::RelayDown(_))));
        assert_eq!(jobs.fatal().as_deref(), Some("waitpid: EINVAL"));
    }
}
