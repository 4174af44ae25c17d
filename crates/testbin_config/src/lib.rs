//! Parsing and validation of `testbin.toml` scheduler configuration.
//!
//! This crate reads the optional configuration file into a strongly-typed
//! [`SchedulerConfig`], parses `CMakeCache.txt` files, and resolves the
//! build and test commands used for timing measurements.

#![warn(missing_docs)]

pub mod cmake_cache;
pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use cmake_cache::CMakeCache;
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_or_default, CONFIG_FILE};
pub use resolve::{resolve_tools, ResolvedTools};
pub use types::*;
