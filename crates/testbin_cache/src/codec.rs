//! Two-stage record decoding and JSON encoding.
//!
//! Records are written as pretty-printed JSON. Reading tries JSON first and
//! then the legacy binary encoding (`bincode`, standard configuration) of the
//! same bytes. The outcome is a [`Decoded`] value rather than an error, so the
//! caller decides between reuse and recomputation.

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;

/// Encoding a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable JSON, the format every write produces.
    Json,
    /// Legacy binary encoding, accepted on read only.
    LegacyBinary,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::LegacyBinary => f.write_str("legacy binary"),
        }
    }
}

/// Outcome of reading a persisted record.
#[derive(Debug)]
pub enum Decoded<T> {
    /// The record was decoded successfully.
    Record {
        /// The decoded value.
        value: T,
        /// The encoding it was stored in.
        format: Format,
    },
    /// No record file exists.
    NotFound,
    /// A file exists but is unreadable in every supported encoding.
    Corrupt {
        /// Why each decoding stage failed.
        reason: String,
    },
}

/// Decodes record bytes, JSON first and legacy binary second.
pub fn decode_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Decoded<T> {
    let json_err = match serde_json::from_slice::<T>(bytes) {
        Ok(value) => {
            return Decoded::Record {
                value,
                format: Format::Json,
            }
        }
        Err(e) => e,
    };

    match bincode::serde::decode_from_slice::<T, _>(bytes, bincode::config::standard()) {
        Ok((value, read)) if read == bytes.len() => Decoded::Record {
            value,
            format: Format::LegacyBinary,
        },
        Ok((_, read)) => Decoded::Corrupt {
            reason: format!(
                "json: {json_err}; legacy binary: {} trailing byte(s)",
                bytes.len() - read
            ),
        },
        Err(bin_err) => Decoded::Corrupt {
            reason: format!("json: {json_err}; legacy binary: {bin_err}"),
        },
    }
}

/// Reads and decodes a record file.
///
/// A missing file is [`Decoded::NotFound`]; any other read failure is treated
/// as corruption.
pub fn decode_file<T: DeserializeOwned>(path: &Path) -> Decoded<T> {
    match std::fs::read(path) {
        Ok(bytes) => decode_bytes(&bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Decoded::NotFound,
        Err(e) => Decoded::Corrupt {
            reason: e.to_string(),
        },
    }
}

/// Serializes a record as pretty JSON terminated by a newline.
pub fn encode_json<T: Serialize>(value: &T) -> Result<String, CacheError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| CacheError::Serialization {
        reason: e.to_string(),
    })?;
    json.push('\n');
    Ok(json)
}

/// Writes a record as JSON, creating the parent directory if needed.
pub fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let json = encode_json(value)?;
    std::fs::write(path, json).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
