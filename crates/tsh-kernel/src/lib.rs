//! tsh-kernel: the job-control core of tsh.
//!
//! This crate provides:
//!
//! - **Lexer / Parser**: Split a command line into an argument vector (logos)
//! - **Scheduler**: The job table, process launcher and signal relay
//! - **Tools**: The `Tool` trait, registry, and the `quit`/`jobs`/`bg`/`fg` built-ins
//! - **Shell**: `eval` for one line, foreground waiting
//! - **Config**: Prompt and job table geometry

pub mod config;
pub mod console;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod scheduler;
pub mod shell;
pub mod tools;

pub use config::ShellConfig;
pub use console::Console;
pub use error::{ShellError, ShellResult};
pub use interpreter::{Eval, ExecResult};
pub use parser::{parse_line, ParsedLine};
pub use scheduler::{JobControl, JobId, JobInfo, JobState};
pub use shell::Shell;
