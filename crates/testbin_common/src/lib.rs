//! Shared foundational types used across the testbin scheduler.
//!
//! This crate provides the workload description (binaries, their test groups,
//! and header-only libraries), delimiter-joined list parsing, and the input
//! validation errors raised while assembling a workload.

#![warn(missing_docs)]

pub mod error;
pub mod group;
pub mod list;
pub mod workload;

pub use error::InputError;
pub use group::TestGroup;
pub use list::{split_groups, split_list};
pub use workload::{TargetKind, Workload};

/// Elapsed wall-clock time in seconds.
pub type Seconds = f64;
