//! Text rendering for the read loop.
//!
//! Command output and diagnostics both go to stdout, in that order, so a
//! driver reading one stream sees everything the user would.

use tsh_kernel::tools::ToolSchema;
use tsh_kernel::ExecResult;

/// Render a command result: its output followed by the diagnostic line.
pub fn format_result(result: &ExecResult) -> String {
    let mut text = result.out.clone();
    if !result.err.is_empty() {
        text.push_str(&result.err);
        text.push('\n');
    }
    text
}

/// Usage text for `tsh -h`, listing the built-in commands.
pub fn format_usage(schemas: &[ToolSchema]) -> String {
    let mut text = String::from(
        "Usage: tsh [-hvp]\n   \
         -h   print this message\n   \
         -v   print additional diagnostic information\n   \
         -p   do not emit a command prompt\n",
    );

    if schemas.is_empty() {
        return text;
    }

    let synopses: Vec<String> = schemas.iter().map(ToolSchema::synopsis).collect();
    let width = synopses.iter().map(String::len).max().unwrap_or(0);

    text.push_str("\nBuilt-in commands:\n");
    for (schema, synopsis) in schemas.iter().zip(&synopses) {
        text.push_str(&format!(
            "   {:<width$}  {}\n",
            synopsis,
            schema.description,
            width = width
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::silent(ExecResult::success(""), "")]
    #[case::output(ExecResult::success("[1] (42) Running sleep 5 &\n"), "[1] (42) Running sleep 5 &\n")]
    #[case::diagnostic(ExecResult::failure(127, "nope: Command not found"), "nope: Command not found\n")]
    fn result_rendering(#[case] result: ExecResult, #[case] expected: &str) {
        assert_eq!(format_result(&result), expected);
    }

    #[test]
    fn usage_lists_builtins_aligned() {
        let schemas = vec![
            ToolSchema::new("bg", "Resume a job in the background").usage("<pid|%jobid>"),
            ToolSchema::new("quit", "Exit the shell"),
        ];
        let usage = format_usage(&schemas);
        assert!(usage.starts_with("Usage: tsh [-hvp]\n"));
        assert!(usage.contains("   bg <pid|%jobid>  Resume a job in the background\n"));
        assert!(usage.contains("   quit             Exit the shell\n"));
    }

    #[test]
    fn usage_without_builtins() {
        let usage = format_usage(&[]);
        assert!(!usage.contains("Built-in"));
        assert!(usage.ends_with("-p   do not emit a command prompt\n"));
    }
}
