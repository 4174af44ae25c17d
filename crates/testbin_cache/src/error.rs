//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur while writing cache records.
///
/// Reads never produce this type: a record that cannot be read is reported
/// as [`Decoded::NotFound`](crate::Decoded::NotFound) or
/// [`Decoded::Corrupt`](crate::Decoded::Corrupt) and triggers recomputation.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while writing a cache file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
