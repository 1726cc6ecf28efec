//! The job table: fixed-capacity registry of live child process groups.
//!
//! The table itself is plain data with no locking. [`JobControl`] owns it
//! behind a mutex and is the only way the rest of the shell reaches it.
//!
//! [`JobControl`]: super::JobControl

use nix::unistd::Pid;
use thiserror::Error;
use tsh_types::{JobId, JobInfo, JobState};

/// One tracked child process group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Job ID.
    pub id: JobId,
    /// Process group leader; the group id equals this pid.
    pub pid: Pid,
    /// Current state.
    pub state: JobState,
    /// The command line exactly as typed.
    pub command: String,
}

impl Job {
    /// Listing snapshot of this job.
    pub fn info(&self) -> JobInfo {
        JobInfo {
            id: self.id,
            pid: self.pid.as_raw(),
            state: self.state,
            command: self.command.clone(),
        }
    }
}

/// Rejected job table updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("tried to create too many jobs (limit {0})")]
    Full(usize),

    #[error("process {0} is already tracked as a job")]
    DuplicatePid(Pid),

    #[error("invalid process id {0}")]
    InvalidPid(Pid),

    #[error("a job cannot be created in state {0}")]
    InvalidInitialState(JobState),

    #[error("job [{0}] already holds the foreground")]
    ForegroundTaken(JobId),

    #[error("({0}): No such process")]
    NoSuchProcess(Pid),
}

/// Slot-based job registry.
///
/// Invariants kept by every mutator:
/// - at most one job is [`JobState::Foreground`];
/// - pids are unique among occupied slots;
/// - job ids increase monotonically until `max_job_id`, then restart at 1,
///   skipping ids still in use.
#[derive(Debug, Clone)]
pub struct JobTable {
    slots: Vec<Option<Job>>,
    next_id: u32,
    max_job_id: u32,
}

impl JobTable {
    /// Create a table with `capacity` slots and job ids in `1..=max_job_id`.
    pub fn new(capacity: usize, max_job_id: u32) -> Self {
        let capacity = capacity.max(1);
        let floor = u32::try_from(capacity).unwrap_or(u32::MAX);
        Self {
            slots: vec![None; capacity],
            next_id: 1,
            max_job_id: max_job_id.max(floor),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live jobs.
    pub fn len(&self) -> usize {
        self.jobs().count()
    }

    /// True when no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.jobs().next().is_none()
    }

    fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.slots.iter().flatten()
    }

    /// Register a newly launched process group and return its job id.
    pub fn add(
        &mut self,
        pid: Pid,
        state: JobState,
        command: impl Into<String>,
    ) -> Result<JobId, TableError> {
        if pid.as_raw() < 1 {
            return Err(TableError::InvalidPid(pid));
        }
        if !state.is_initial() {
            return Err(TableError::InvalidInitialState(state));
        }
        if self.lookup_by_pid(pid).is_some() {
            return Err(TableError::DuplicatePid(pid));
        }
        if state == JobState::Foreground {
            if let Some(holder) = self.foreground() {
                return Err(TableError::ForegroundTaken(holder.id));
            }
        }

        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(TableError::Full(self.slots.len()))?;

        let id = self.allocate_id();
        let command = command.into();
        tracing::debug!("added job [{}] {} {}", id, pid, command.trim_end());
        self.slots[slot] = Some(Job {
            id,
            pid,
            state,
            command,
        });
        Ok(id)
    }

    // Only called with a free slot, so fewer than `max_job_id` ids are taken
    // and the scan always terminates.
    fn allocate_id(&mut self) -> JobId {
        loop {
            let candidate = self.next_id;
            self.next_id = if candidate >= self.max_job_id { 1 } else { candidate + 1 };
            if !self.jobs().any(|job| job.id.0 == candidate) {
                return JobId(candidate);
            }
        }
    }

    /// Clear the slot holding `pid`. Returns whether one was found.
    ///
    /// Removing an absent pid is a no-op so duplicate child notifications
    /// are harmless.
    pub fn remove(&mut self, pid: Pid) -> bool {
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|job| job.pid == pid) {
                if let Some(job) = slot.take() {
                    tracing::debug!("removed job [{}] {}", job.id, job.pid);
                }
                return true;
            }
        }
        false
    }

    /// The live job whose process group leader is `pid`.
    pub fn lookup_by_pid(&self, pid: Pid) -> Option<&Job> {
        self.jobs().find(|job| job.pid == pid)
    }

    /// The live job with id `id`.
    pub fn lookup_by_jid(&self, id: JobId) -> Option<&Job> {
        self.jobs().find(|job| job.id == id)
    }

    /// The job holding the foreground slot, if any.
    pub fn foreground(&self) -> Option<&Job> {
        self.jobs().find(|job| job.state == JobState::Foreground)
    }

    /// Pid of the job holding the foreground slot, if any.
    pub fn foreground_pid(&self) -> Option<Pid> {
        self.foreground().map(|job| job.pid)
    }

    /// Job id of the job led by `pid`.
    pub fn pid_to_jid(&self, pid: Pid) -> Option<JobId> {
        self.lookup_by_pid(pid).map(|job| job.id)
    }

    /// Move a job to `state`.
    ///
    /// Promoting to foreground fails while a different job holds the slot.
    pub fn set_state(&mut self, pid: Pid, state: JobState) -> Result<(), TableError> {
        if state == JobState::Foreground {
            if let Some(holder) = self.foreground().filter(|job| job.pid != pid) {
                return Err(TableError::ForegroundTaken(holder.id));
            }
        }
        let job = self
            .slots
            .iter_mut()
            .flatten()
            .find(|job| job.pid == pid)
            .ok_or(TableError::NoSuchProcess(pid))?;
        tracing::debug!("job [{}] {} {:?} -> {:?}", job.id, job.pid, job.state, state);
        job.state = state;
        Ok(())
    }

    /// All live jobs ordered by ascending job id.
    pub fn list(&self) -> Vec<JobInfo> {
        let mut jobs: Vec<JobInfo> = self.jobs().map(Job::info).collect();
        jobs.sort_by_key(|job| job.id);
        jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: i32) -> Pid {
        Pid::from_raw(raw)
    }

    fn foreground_count(table: &JobTable) -> usize {
        table
            .list()
            .iter()
            .filter(|job| job.state == JobState::Foreground)
            .count()
    }

    #[test]
    fn add_then_lookup_round_trips() {
        let mut table = JobTable::new(16, 1 << 16);
        let id = table.add(pid(100), JobState::Background, "sleep 5 &").unwrap();

        let job = table.lookup_by_pid(pid(100)).unwrap();
        assert_eq!(job.id, id);
        assert_eq!(job.state, JobState::Background);
        assert_eq!(job.command, "sleep 5 &");
        assert_eq!(table.lookup_by_jid(id).unwrap().pid, pid(100));
        assert_eq!(table.pid_to_jid(pid(100)), Some(id));
    }

    #[test]
    fn first_job_is_one_and_ids_increase() {
        let mut table = JobTable::new(16, 1 << 16);
        let a = table.add(pid(10), JobState::Background, "a").unwrap();
        let b = table.add(pid(11), JobState::Background, "b").unwrap();
        let c = table.add(pid(12), JobState::Foreground, "c").unwrap();
        assert_eq!(a, JobId(1));
        assert!(a < b && b < c);
    }

    #[test]
    fn ids_are_not_reused_before_wraparound() {
        let mut table = JobTable::new(4, 100);
        let a = table.add(pid(10), JobState::Background, "a").unwrap();
        table.remove(pid(10));
        let b = table.add(pid(11), JobState::Background, "b").unwrap();
        assert!(b > a);
    }

    #[test]
    fn ids_wrap_and_skip_live_ones() {
        let mut table = JobTable::new(3, 3);
        table.add(pid(10), JobState::Background, "a").unwrap(); // 1
        table.add(pid(11), JobState::Background, "b").unwrap(); // 2
        table.add(pid(12), JobState::Background, "c").unwrap(); // 3
        table.remove(pid(11));

        // next_id wrapped to 1, which is still live; 2 is free.
        let id = table.add(pid(13), JobState::Background, "d").unwrap();
        assert_eq!(id, JobId(2));
    }

    #[test]
    fn full_table_rejects() {
        let mut table = JobTable::new(2, 100);
        table.add(pid(10), JobState::Background, "a").unwrap();
        table.add(pid(11), JobState::Background, "b").unwrap();
        assert_eq!(
            table.add(pid(12), JobState::Background, "c"),
            Err(TableError::Full(2))
        );
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn duplicate_pid_rejected() {
        let mut table = JobTable::new(4, 100);
        table.add(pid(10), JobState::Background, "a").unwrap();
        assert_eq!(
            table.add(pid(10), JobState::Background, "again"),
            Err(TableError::DuplicatePid(pid(10)))
        );
    }

    #[test]
    fn invalid_pid_and_state_rejected() {
        let mut table = JobTable::new(4, 100);
        assert_eq!(
            table.add(pid(0), JobState::Background, "x"),
            Err(TableError::InvalidPid(pid(0)))
        );
        assert_eq!(
            table.add(pid(5), JobState::Stopped, "x"),
            Err(TableError::InvalidInitialState(JobState::Stopped))
        );
        assert!(table.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut table = JobTable::new(4, 100);
        table.add(pid(10), JobState::Foreground, "a").unwrap();
        assert!(table.remove(pid(10)));
        assert!(!table.remove(pid(10)));
        assert!(!table.remove(pid(999)));
        assert!(table.is_empty());
    }

    #[test]
    fn single_foreground_slot() {
        let mut table = JobTable::new(4, 100);
        let first = table.add(pid(10), JobState::Foreground, "a").unwrap();
        assert_eq!(
            table.add(pid(11), JobState::Foreground, "b"),
            Err(TableError::ForegroundTaken(first))
        );

        table.add(pid(11), JobState::Background, "b").unwrap();
        assert_eq!(
            table.set_state(pid(11), JobState::Foreground),
            Err(TableError::ForegroundTaken(first))
        );
        assert_eq!(foreground_count(&table), 1);

        table.set_state(pid(10), JobState::Stopped).unwrap();
        assert_eq!(table.foreground_pid(), None);
        table.set_state(pid(11), JobState::Foreground).unwrap();
        assert_eq!(table.foreground_pid(), Some(pid(11)));
        assert_eq!(foreground_count(&table), 1);
    }

    #[test]
    fn refreshing_own_foreground_is_allowed() {
        let mut table = JobTable::new(4, 100);
        table.add(pid(10), JobState::Foreground, "a").unwrap();
        assert!(table.set_state(pid(10), JobState::Foreground).is_ok());
    }

    #[test]
    fn set_state_unknown_pid() {
        let mut table = JobTable::new(4, 100);
        assert_eq!(
            table.set_state(pid(42), JobState::Background),
            Err(TableError::NoSuchProcess(pid(42)))
        );
    }

    #[test]
    fn list_orders_by_job_id_not_slot() {
        let mut table = JobTable::new(3, 100);
        table.add(pid(10), JobState::Background, "a").unwrap(); // slot 0, id 1
        table.add(pid(11), JobState::Background, "b").unwrap(); // slot 1, id 2
        table.remove(pid(10));
        table.add(pid(12), JobState::Background, "c").unwrap(); // slot 0, id 3

        let ids: Vec<u32> = table.list().iter().map(|job| job.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn foreground_pid_none_when_empty() {
        let table = JobTable::new(4, 100);
        assert_eq!(table.foreground_pid(), None);
        assert_eq!(table.capacity(), 4);
    }
}
