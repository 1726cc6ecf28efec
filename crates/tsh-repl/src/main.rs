//! tsh CLI entry point.
//!
//! Usage:
//!   tsh          # Interactive shell with prompt
//!   tsh -p       # No prompt; commands read line by line from stdin
//!   tsh -v       # Debug-level diagnostics on stderr
//!   tsh -h       # Usage

use std::env;
use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tsh_kernel::tools::{register_builtins, ToolRegistry};
use tsh_kernel::ShellConfig;
use tsh_repl::format::format_usage;

/// Parsed command line flags.
#[derive(Debug, Default, PartialEq, Eq)]
struct Flags {
    help: bool,
    verbose: bool,
    no_prompt: bool,
}

/// Parse `-h`, `-v` and `-p`, alone or combined (`-vp`).
fn parse_flags(args: &[String]) -> Result<Flags, String> {
    let mut flags = Flags::default();
    for arg in args {
        let Some(letters) = arg.strip_prefix('-').filter(|l| !l.is_empty()) else {
            return Err(arg.clone());
        };
        for letter in letters.chars() {
            match letter {
                'h' => flags.help = true,
                'v' => flags.verbose = true,
                'p' => flags.no_prompt = true,
                _ => return Err(arg.clone()),
            }
        }
    }
    Ok(flags)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let flags = match parse_flags(&args) {
        Ok(flags) => flags,
        Err(unknown) => {
            println!("Unknown option: {unknown}");
            print!("{}", usage());
            return ExitCode::FAILURE;
        }
    };

    if flags.help {
        print!("{}", usage());
        return ExitCode::SUCCESS;
    }

    // -v forces debug output; otherwise RUST_LOG, defaulting to warnings.
    let filter = if flags.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(flags: Flags) -> Result<()> {
    let config = ShellConfig::from_env()
        .with_emit_prompt(!flags.no_prompt)
        .with_verbose(flags.verbose);
    tsh_repl::run(config)
}

fn usage() -> String {
    let mut tools = ToolRegistry::new();
    register_builtins(&mut tools);
    format_usage(&tools.schemas())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case::none(&[], Flags::default())]
    #[case::separate(&["-v", "-p"], Flags { help: false, verbose: true, no_prompt: true })]
    #[case::combined(&["-hvp"], Flags { help: true, verbose: true, no_prompt: true })]
    fn accepted_flags(#[case] given: &[&str], #[case] expected: Flags) {
        assert_eq!(parse_flags(&args(given)), Ok(expected));
    }

    #[rstest]
    #[case::unknown_letter(&["-x"], "-x")]
    #[case::bare_dash(&["-"], "-")]
    #[case::positional(&["script.sh"], "script.sh")]
    fn rejected_flags(#[case] given: &[&str], #[case] offending: &str) {
        assert_eq!(parse_flags(&args(given)), Err(offending.to_string()));
    }
}
