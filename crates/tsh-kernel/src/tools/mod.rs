//! Built-in commands for tsh.
//!
//! Every built-in implements the same [`Tool`] trait and is looked up by name
//! in a [`ToolRegistry`] before the shell falls back to launching a program.
//!
//! ```text
//! ToolRegistry
//! ├── quit   terminate the shell
//! ├── jobs   list the job table
//! ├── bg     continue a job in the background
//! └── fg     continue a job in the foreground and wait for it
//! ```

mod builtin;
mod context;
mod registry;
mod traits;

pub use builtin::{parse_job_spec, register_builtins, JobSpec};
pub use context::ExecContext;
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolArgs, ToolSchema};
