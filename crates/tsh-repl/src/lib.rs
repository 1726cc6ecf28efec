//! tsh read loop.
//!
//! Reads one command line at a time and hands it to the job-control
//! [`Shell`]. Interactive sessions on a terminal get line editing and
//! history via rustyline; everything else (pipes, `-p`) reads stdin line by
//! line so a driver can feed commands and read results in order.

pub mod format;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tokio::runtime::Runtime;

use tsh_kernel::{Eval, Shell, ShellConfig};

use crate::format::format_result;

/// What the read loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Print this text (possibly empty) and read the next line.
    Continue(String),
    /// `quit` was entered: print this text and stop.
    Quit(String),
}

/// A shell plus the runtime that drives it.
pub struct Repl {
    // Declared before `runtime` so the relay is aborted while the runtime
    // still exists.
    shell: Shell,
    runtime: Runtime,
}

impl Repl {
    /// Start a shell with the given configuration.
    ///
    /// From here on the process handles SIGINT, SIGTSTP, SIGQUIT and
    /// SIGCHLD itself.
    pub fn new(config: ShellConfig) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let shell = {
            let _guard = runtime.enter();
            Shell::new(config).context("Failed to start job control")?
        };
        Ok(Self { shell, runtime })
    }

    /// The underlying shell.
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Evaluate one line, blocking while a foreground job runs.
    ///
    /// Errors mean job control is broken and the shell has to exit.
    pub fn process_line(&mut self, line: &str) -> Result<Step> {
        let eval = self
            .runtime
            .block_on(self.shell.eval(line))
            .context("Job control failed")?;
        Ok(match eval {
            Eval::Continue(result) => Step::Continue(format_result(&result)),
            Eval::Quit(result) => Step::Quit(format_result(&result)),
        })
    }
}

/// Print a step's text and report whether to keep going.
fn emit(step: Step) -> Result<bool> {
    let (text, keep_going) = match step {
        Step::Continue(text) => (text, true),
        Step::Quit(text) => (text, false),
    };
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(keep_going)
}

/// Save history to disk.
fn save_history(rl: &mut Editor<(), DefaultHistory>, history_path: &Option<PathBuf>) {
    if let Some(path) = history_path {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create history directory: {}", e);
            }
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("Failed to save history: {}", e);
        }
    }
}

/// Run the shell until `quit` or end of input.
pub fn run(config: ShellConfig) -> Result<()> {
    let mut repl = Repl::new(config)?;
    let config = repl.shell().config();
    let prompt = config.emit_prompt.then(|| config.prompt.clone());

    match prompt {
        Some(prompt) if io::stdin().is_terminal() => run_interactive(&mut repl, &prompt),
        prompt => run_lines(&mut repl, prompt.as_deref()),
    }
}

fn run_interactive(repl: &mut Repl, prompt: &str) -> Result<()> {
    let mut rl: Editor<(), DefaultHistory> =
        Editor::new().context("Failed to create editor")?;

    let history_path = directories::BaseDirs::new()
        .map(|b| b.data_dir().join("tsh").join("history.txt"));
    if let Some(ref path) = history_path {
        if let Err(e) = rl.load_history(path) {
            // Missing on first run.
            let is_not_found = matches!(&e, ReadlineError::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound);
            if !is_not_found {
                tracing::warn!("Failed to load history: {}", e);
            }
        }
    }

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = rl.add_history_entry(line.as_str()) {
                        tracing::warn!("Failed to add history entry: {}", e);
                    }
                }
                let step = match repl.process_line(&line) {
                    Ok(step) => step,
                    Err(e) => {
                        save_history(&mut rl, &history_path);
                        return Err(e);
                    }
                };
                if !emit(step)? {
                    break;
                }
            }
            // Ctrl-C at the prompt, with no foreground job, just discards the line.
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                save_history(&mut rl, &history_path);
                return Err(err).context("Failed to read command line");
            }
        }
        repl.shell().check().context("Job control failed")?;
    }

    save_history(&mut rl, &history_path);
    Ok(())
}

fn run_lines(repl: &mut Repl, prompt: Option<&str>) -> Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        if let Some(prompt) = prompt {
            let mut stdout = io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read command line")?;
        if read == 0 {
            tracing::debug!("end of input");
            return Ok(());
        }

        if !emit(repl.process_line(&line)?)? {
            return Ok(());
        }
        repl.shell().check().context("Job control failed")?;
    }
}
