//! Job identification and state types.

use std::fmt;

/// Small positive identifier for a job, unique among live jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(pub u32);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a live job sits in the job-control state machine.
///
/// An empty table slot has no state at all; there is no `Undefined` variant
/// because a slot without a job is represented by its absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Owns the foreground slot; the shell is waiting on it.
    Foreground,
    /// Running without holding the foreground slot.
    Background,
    /// Suspended by a stop signal.
    Stopped,
}

impl JobState {
    /// Label used by the `jobs` listing.
    pub fn label(self) -> &'static str {
        match self {
            JobState::Foreground => "Foreground",
            JobState::Background => "Running",
            JobState::Stopped => "Stopped",
        }
    }

    /// States a job may be created in.
    pub fn is_initial(self) -> bool {
        matches!(self, JobState::Foreground | JobState::Background)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of a job for listing and lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    /// Job ID.
    pub id: JobId,
    /// Process group leader; also the process group id.
    pub pid: i32,
    /// Current state.
    pub state: JobState,
    /// The command line exactly as typed.
    pub command: String,
}

impl fmt::Display for JobInfo {
    /// `[<job_id>] (<process_id>) <state_label> <command_line>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) {} {}", self.id, self.pid, self.state, self.command)
    }
}
