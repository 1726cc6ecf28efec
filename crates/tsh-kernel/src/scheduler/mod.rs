//! Job control for tsh: the job table and everything that mutates it.
//!
//! # Architecture
//!
//! ```text
//!  main flow                                   kernel
//!  ─────────                                   ──────
//!  eval ──▶ launcher ──spawn(pgid = pid)──▶ child process group
//!    │          │                                 │
//!    │          ▼                                 │ SIGCHLD / SIGINT / SIGTSTP
//!    │   ┌──────────────┐                         ▼
//!    ├──▶│  JobControl  │◀──────────────── SignalRelay task
//!    │   │ Mutex<Table> │   reap / forward / mark stopped
//!    │   └──────┬───────┘
//!    │          │ watch: foreground pid
//!    └── waitfg ◀┘
//! ```
//!
//! - **JobTable**: fixed-capacity slots, lookups by pid and job id.
//! - **JobControl**: the only owner of the table; publishes foreground changes.
//! - **launcher**: starts a program as its own process group leader.
//! - **SignalRelay**: dedicated task reacting to kernel notifications.

mod job;
mod launcher;
mod relay;
mod table;

pub use job::{signal_group, stopped_notice, terminated_notice, JobControl, TableGuard};
pub use launcher::{launch, Launch};
pub use relay::{SignalRelay, SIGQUIT_NOTICE};
pub use table::{Job, JobTable, TableError};
pub use tsh_types::{JobId, JobInfo, JobState};
