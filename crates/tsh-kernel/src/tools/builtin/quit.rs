//! quit: Terminate the shell.

use async_trait::async_trait;

use crate::error::ShellResult;
use crate::interpreter::{Eval, ExecResult};
use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Quit tool: ends the read loop. Children are left to the OS.
pub struct Quit;

#[async_trait]
impl Tool for Quit {
    fn name(&self) -> &str {
        "quit"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("quit", "Exit the shell without waiting for jobs")
            .example("Leave the shell", "quit")
    }

    async fn execute(&self, _args: ToolArgs, _ctx: &ExecContext) -> ShellResult<Eval> {
        Ok(Eval::Quit(ExecResult::success("Quit\n")))
    }
}
