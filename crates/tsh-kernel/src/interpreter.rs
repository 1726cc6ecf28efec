//! Results of evaluating a command line.
//!
//! - **ExecResult**: what one command produced (exit code, output, error text)
//! - **Eval**: whether the read loop should keep going

mod result;

pub use result::{Eval, ExecResult};
