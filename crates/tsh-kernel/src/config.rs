//! Shell configuration.

/// Default prompt printed before each command line.
pub const DEFAULT_PROMPT: &str = "tsh> ";

/// Default number of job table slots.
pub const DEFAULT_MAX_JOBS: usize = 16;

/// Default size of the job id space before ids wrap back to 1.
pub const DEFAULT_MAX_JOB_ID: u32 = 1 << 16;

/// Environment variable overriding the prompt.
pub const PROMPT_ENV: &str = "TSH_PROMPT";

/// Configuration for a [`Shell`](crate::Shell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Prompt printed before reading each line.
    pub prompt: String,

    /// Whether the read loop prints the prompt at all.
    ///
    /// Drivers feeding commands on stdin turn this off (`tsh -p`).
    pub emit_prompt: bool,

    /// Emit additional diagnostics (debug-level tracing).
    pub verbose: bool,

    /// Number of job table slots.
    pub max_jobs: usize,

    /// Highest job id handed out before allocation restarts from 1.
    pub max_job_id: u32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            emit_prompt: true,
            verbose: false,
            max_jobs: DEFAULT_MAX_JOBS,
            max_job_id: DEFAULT_MAX_JOB_ID,
        }
    }
}

impl ShellConfig {
    /// Defaults, with the prompt taken from `TSH_PROMPT` when set.
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(PROMPT_ENV) {
            Ok(prompt) => config.with_prompt(prompt),
            Err(_) => config,
        }
    }

    /// Set the prompt string.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Enable or disable prompt printing.
    pub fn with_emit_prompt(mut self, emit: bool) -> Self {
        self.emit_prompt = emit;
        self
    }

    /// Enable verbose diagnostics.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the number of job table slots. Zero is raised to one.
    pub fn with_max_jobs(mut self, max_jobs: usize) -> Self {
        self.max_jobs = max_jobs.max(1);
        self
    }

    /// Set the size of the job id space.
    ///
    /// Never smaller than the slot count, so a free id always exists while
    /// a slot is free.
    pub fn with_max_job_id(mut self, max_job_id: u32) -> Self {
        let floor = u32::try_from(self.max_jobs).unwrap_or(u32::MAX);
        self.max_job_id = max_job_id.max(floor);
        self
    }
}
