//! `<pid|%jobid>` arguments shared by `fg` and `bg`.

use nix::unistd::Pid;
use tsh_types::JobId;

use crate::interpreter::ExecResult;
use crate::scheduler::{Job, JobControl};

/// A reference to a job as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSpec {
    /// A bare number: process id.
    Pid(Pid),
    /// `%N`: job id.
    Job(JobId),
}

/// Parse the argument of `fg`/`bg`.
///
/// The error is the usage message to show the user.
pub fn parse_job_spec(cmd: &str, arg: Option<&str>) -> Result<JobSpec, String> {
    let Some(arg) = arg else {
        return Err(format!("{} command requires PID or %jobid argument", cmd));
    };
    let invalid = || format!("{}: argument must be a PID or %jobid", cmd);

    if let Some(jid) = arg.strip_prefix('%') {
        return jid
            .parse::<u32>()
            .map(|n| JobSpec::Job(JobId(n)))
            .map_err(|_| invalid());
    }
    arg.parse::<i32>()
        .ok()
        .filter(|n| *n > 0)
        .map(|n| JobSpec::Pid(Pid::from_raw(n)))
        .ok_or_else(invalid)
}

/// Resolve the argument of `fg`/`bg` to a live job.
///
/// Usage errors and unknown jobs come back as a failed result ready to show.
pub(super) fn resolve(jobs: &JobControl, cmd: &str, arg: Option<&str>) -> Result<Job, ExecResult> {
    let spec = parse_job_spec(cmd, arg).map_err(|msg| ExecResult::failure(2, msg))?;
    match spec {
        JobSpec::Pid(pid) => jobs
            .lookup_by_pid(pid)
            .ok_or_else(|| ExecResult::failure(1, format!("({}): No such process", pid))),
        JobSpec::Job(id) => jobs
            .lookup_by_jid(id)
            .ok_or_else(|| ExecResult::failure(1, format!("%{}: No such job", id))),
    }
}
