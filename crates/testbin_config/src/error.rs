//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A line of a `CMakeCache.txt` file is not of the form `KEY:TYPE=VALUE`.
    #[error("malformed CMake cache entry in {path} at line {line}: {content}")]
    CMakeCacheSyntax {
        /// The cache file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },
}
