//! On-disk location and load/save of the three timing records.
//!
//! All files live directly in the cache directory:
//! `compiles_totals.json`, `testruns_totals.json` and `totals.json`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::{decode_file, write_file, Decoded};
use crate::error::CacheError;
use crate::records::{CompileRecord, TestRunRecord, Totals};

/// File name of the compile-duration record.
const COMPILES_FILE: &str = "compiles_totals.json";

/// File name of the test-run-duration record.
const TESTRUNS_FILE: &str = "testruns_totals.json";

/// File name of the combined totals.
const TOTALS_FILE: &str = "totals.json";

/// Reads and writes timing records in a cache directory.
///
/// Loading is fail-safe and returns a [`Decoded`] outcome; saving creates the
/// directory on demand.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Directory holding the record files.
    cache_dir: PathBuf,
}

impl RecordStore {
    /// Creates a store rooted at the given cache directory.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    /// Path of the compile-duration record.
    pub fn compiles_path(&self) -> PathBuf {
        self.cache_dir.join(COMPILES_FILE)
    }

    /// Path of the test-run-duration record.
    pub fn testruns_path(&self) -> PathBuf {
        self.cache_dir.join(TESTRUNS_FILE)
    }

    /// Path of the combined totals.
    pub fn totals_path(&self) -> PathBuf {
        self.cache_dir.join(TOTALS_FILE)
    }

    /// Loads the compile-duration record.
    pub fn load_compiles(&self) -> Decoded<CompileRecord> {
        decode_file(&self.compiles_path())
    }

    /// Persists the compile-duration record.
    pub fn save_compiles(&self, record: &CompileRecord) -> Result<(), CacheError> {
        debug!(entries = record.len(), "saving compile record");
        write_file(&self.compiles_path(), record)
    }

    /// Loads the test-run-duration record.
    pub fn load_testruns(&self) -> Decoded<TestRunRecord> {
        decode_file(&self.testruns_path())
    }

    /// Persists the test-run-duration record.
    pub fn save_testruns(&self, record: &TestRunRecord) -> Result<(), CacheError> {
        debug!(entries = record.runs.len(), "saving test-run record");
        write_file(&self.testruns_path(), record)
    }

    /// Persists the combined totals.
    pub fn save_totals(&self, totals: &Totals) -> Result<(), CacheError> {
        debug!(entries = totals.len(), "saving totals");
        write_file(&self.totals_path(), totals)
    }
}
