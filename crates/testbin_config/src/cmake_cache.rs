//! Reader for `CMakeCache.txt` files.
//!
//! Each entry has the form `KEY:TYPE=VALUE`. Lines starting with `#` or `//`
//! are comments. For every `<NAME>_DIR` entry a derived flag `<NAME>` records
//! whether the directory exists, which is how CMake-configured packages are
//! told apart from ones that were merely looked for.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;

/// Parsed contents of a CMake cache.
#[derive(Debug, Default, Clone)]
pub struct CMakeCache {
    values: BTreeMap<String, String>,
    found: BTreeMap<String, bool>,
}

impl CMakeCache {
    /// Reads and parses a cache file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parses cache text; `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let mut cache = Self::default();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            let syntax_error = || ConfigError::CMakeCacheSyntax {
                path: origin.to_path_buf(),
                line: idx + 1,
                content: raw.to_string(),
            };
            let (decl, value) = line.split_once('=').ok_or_else(syntax_error)?;
            let (key, _) = decl.rsplit_once(':').ok_or_else(syntax_error)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(syntax_error());
            }
            let value = value.trim();

            if let Some(name) = key.strip_suffix("_DIR") {
                cache
                    .found
                    .insert(name.to_string(), Path::new(value).is_dir());
            }
            cache.values.insert(key.to_string(), value.to_string());
        }
        Ok(cache)
    }

    /// Returns the value of an entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns whether the `<name>_DIR` entry points at an existing directory.
    pub fn is_found(&self, name: &str) -> Option<bool> {
        self.found.get(name).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
