//! Core tool traits and types.

use async_trait::async_trait;

use crate::error::ShellResult;
use crate::interpreter::Eval;

use super::context::ExecContext;

/// Schema describing a built-in's interface, used for help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSchema {
    /// Tool name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Argument synopsis, e.g. `<pid|%jobid>`.
    pub usage: String,
    /// Examples as (description, command) pairs.
    pub examples: Vec<(String, String)>,
}

impl ToolSchema {
    /// Create a new tool schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            usage: String::new(),
            examples: Vec::new(),
        }
    }

    /// Set the argument synopsis.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Add an example.
    pub fn example(mut self, description: impl Into<String>, command: impl Into<String>) -> Self {
        self.examples.push((description.into(), command.into()));
        self
    }

    /// `name usage`, trimmed when there is no usage.
    pub fn synopsis(&self) -> String {
        if self.usage.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.usage)
        }
    }
}

/// Arguments handed to a built-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArgs {
    /// The name the built-in was invoked as.
    pub name: String,
    /// Positional arguments after the name.
    pub positional: Vec<String>,
}

impl ToolArgs {
    /// Split an argument vector into name and positionals.
    pub fn from_argv(argv: &[String]) -> Self {
        match argv.split_first() {
            Some((name, rest)) => Self {
                name: name.clone(),
                positional: rest.to_vec(),
            },
            None => Self::default(),
        }
    }

    /// Get a positional argument by index.
    pub fn get_positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }
}

/// A command interpreted by the shell itself.
///
/// Per-command problems are returned as a failed `ExecResult`; only errors
/// that leave the job table untrustworthy come back as `Err`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's name (used for lookup).
    fn name(&self) -> &str;

    /// Get the tool's schema.
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given arguments and context.
    async fn execute(&self, args: ToolArgs, ctx: &ExecContext) -> ShellResult<Eval>;
}
