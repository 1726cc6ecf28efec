//! Built-in tools for tsh.
//!
//! These are interpreted by the shell itself and never launched as programs.

mod bg;
mod fg;
mod job_spec;
mod jobs;
mod quit;

pub use job_spec::{parse_job_spec, JobSpec};

use super::ToolRegistry;

/// Register all built-in tools with the registry.
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(bg::Bg);
    registry.register(fg::Fg);
    registry.register(jobs::Jobs);
    registry.register(quit::Quit);
}
