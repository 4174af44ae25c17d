//! Persisted timing records for incremental test scheduling.
//!
//! This crate stores measured compile and test-run durations between runs so
//! that only targets and test groups that changed have to be measured again.
//! Records are written as JSON; reads fall back to a legacy binary encoding.

#![warn(missing_docs)]

pub mod codec;
pub mod diff;
pub mod error;
pub mod records;
pub mod store;

pub use codec::{Decoded, Format};
pub use diff::KeyDiff;
pub use error::CacheError;
pub use records::{CompileRecord, TestRunRecord, Totals};
pub use store::RecordStore;
