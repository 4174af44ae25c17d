//! Timing-based distribution of test binaries across CI workers.
//!
//! The scheduler measures how long each target takes to compile and how long
//! each binary's tests take to run, keeps those measurements in a persistent
//! cache, packs the per-target totals into bins of similar cost, and renders a
//! CMake fragment that labels every test with the bin it belongs to.

#![warn(missing_docs)]

pub mod error;
pub mod fragment;
pub mod partition;
pub mod pool;
pub mod stats;
pub mod timings;
pub mod toolchain;

pub use error::SchedError;
pub use fragment::{render_fragment, write_fragment};
pub use partition::{pack, partition, partition_by_volume, Bin};
pub use pool::WorkerPool;
pub use stats::BinStats;
pub use timings::TimingCollector;
pub use toolchain::{ProcessToolchain, Toolchain};
