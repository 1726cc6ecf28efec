//! Process launcher: turns an argument vector into a new process group.
//!
//! Every job is started as the leader of its own process group
//! (`process_group(0)`), so keyboard signals aimed at the shell's group never
//! reach it directly and signals aimed at the job reach everything it spawns.
//!
//! The table lock is taken before the child is created and released only
//! after the job is registered. The relay takes the same lock before it
//! reaps, so a child that dies immediately is never observed before the
//! table knows its pid.

use std::io;
use std::os::unix::process::CommandExt;
use std::process::Command;

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use tsh_types::{JobInfo, JobState};

use super::job::{signal_group, JobControl};
use super::table::TableError;
use crate::error::ShellResult;

/// What became of a launch request.
#[derive(Debug)]
pub enum Launch {
    /// The program is running and registered.
    Started(JobInfo),
    /// The program could not be executed (missing, not executable).
    NotFound,
    /// The process could not be created at all.
    SpawnFailed(io::Error),
    /// The table refused the job; the process group was killed.
    Rejected(TableError),
}

/// Start `argv` in a new process group and register it as `state`.
///
/// `command` is the raw line, kept for listings.
pub fn launch(
    jobs: &JobControl,
    argv: &[String],
    command: &str,
    state: JobState,
) -> ShellResult<Launch> {
    let Some((program, args)) = argv.split_first() else {
        return Ok(Launch::NotFound);
    };

    let mut table = jobs.lock();

    let child = match Command::new(program).args(args).process_group(0).spawn() {
        Ok(child) => child,
        Err(e) if is_exec_failure(&e) => {
            tracing::debug!("exec {} failed: {}", program, e);
            return Ok(Launch::NotFound);
        }
        Err(e) => {
            tracing::warn!("failed to create process for {}: {}", program, e);
            return Ok(Launch::SpawnFailed(e));
        }
    };

    // The relay reaps by pid; the std handle is never waited on.
    let raw = i32::try_from(child.id()).unwrap_or(i32::MAX);
    let pid = Pid::from_raw(raw);
    drop(child);

    match table.add(pid, state, command) {
        Ok(id) => {
            let info = JobInfo {
                id,
                pid: raw,
                state,
                command: command.to_string(),
            };
            Ok(Launch::Started(info))
        }
        Err(e) => {
            tracing::warn!("job table rejected {}: {}", pid, e);
            signal_group(pid, Signal::SIGKILL)?;
            Ok(Launch::Rejected(e))
        }
    }
}

/// Failures that mean the program itself could not be run, as opposed to
/// the system being unable to create a process.
fn is_exec_failure(e: &io::Error) -> bool {
    if matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    ) {
        return true;
    }
    matches!(
        e.raw_os_error().map(Errno::from_raw),
        Some(Errno::ENOEXEC | Errno::ENOTDIR | Errno::EISDIR | Errno::ELOOP | Errno::ENAMETOOLONG)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_failures_classified() {
        assert!(is_exec_failure(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(is_exec_failure(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(is_exec_failure(&io::Error::from_raw_os_error(Errno::ENOEXEC as i32)));
        assert!(!is_exec_failure(&io::Error::from_raw_os_error(Errno::EAGAIN as i32)));
        assert!(!is_exec_failure(&io::Error::from_raw_os_error(Errno::ENOMEM as i32)));
    }
}
