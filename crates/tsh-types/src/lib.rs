//! Pure data types for tsh: job ids, job states and listing snapshots.
//!
//! This crate is a leaf dependency with no runtime and no OS access, so
//! reporting surfaces can consume job listings without pulling in the kernel.

pub mod job;

pub use job::*;
