//! Incremental collection of compile and test-run timings.
//!
//! Both records are loaded from the cache, compared against the current
//! workload, and repaired: entries for targets or groups that disappeared are
//! dropped and only the missing ones are measured. A record that cannot be
//! read at all is rebuilt from scratch. Each record is written back as soon as
//! its phase completes, including after a partially failed phase, so the next
//! run resumes from whatever was measured.

use testbin_cache::{CompileRecord, Decoded, KeyDiff, RecordStore, TestRunRecord, Totals};
use testbin_common::{Seconds, TestGroup, Workload};
use tracing::{debug, info, warn};

use crate::error::SchedError;
use crate::pool::WorkerPool;
use crate::toolchain::Toolchain;

/// Computes per-target totals, reusing cached measurements where possible.
pub struct TimingCollector<'a, T: Toolchain> {
    store: &'a RecordStore,
    toolchain: &'a T,
    pool: WorkerPool,
}

impl<'a, T: Toolchain> TimingCollector<'a, T> {
    /// Creates a collector over a record store and a toolchain.
    pub fn new(store: &'a RecordStore, toolchain: &'a T, pool: WorkerPool) -> Self {
        Self {
            store,
            toolchain,
            pool,
        }
    }

    /// Brings both records up to date and combines them into totals.
    ///
    /// Compile timing completes for every target before any test is run.
    /// The totals are persisted before they are returned.
    pub fn compute_totals(&self, workload: &Workload) -> Result<Totals, SchedError> {
        let compiles = self.refresh_compiles(workload)?;
        let runs = self.refresh_testruns(workload)?;

        let mut totals = Totals::new();
        for (binary, group) in workload.binary_groups() {
            let compile = compiles
                .get(binary)
                .ok_or_else(|| SchedError::MissingTiming(binary.to_string()))?;
            let run = runs
                .get(group)
                .ok_or_else(|| SchedError::MissingTiming(group.to_string()))?;
            totals.insert(binary, compile + run);
        }
        for lib in workload.header_libs() {
            let compile = compiles
                .get(lib)
                .ok_or_else(|| SchedError::MissingTiming(lib.clone()))?;
            totals.insert(lib.as_str(), compile);
        }

        self.store.save_totals(&totals)?;
        info!(targets = totals.len(), total = totals.sum(), "computed totals");
        Ok(totals)
    }

    /// Loads the compile record, measures missing targets, drops stale ones.
    pub fn refresh_compiles(&self, workload: &Workload) -> Result<CompileRecord, SchedError> {
        let mut record = match self.store.load_compiles() {
            Decoded::Record { value, format } => {
                debug!(%format, entries = value.len(), "loaded compile record");
                value
            }
            Decoded::NotFound => {
                info!("redoing compiles due to missing record");
                CompileRecord::new()
            }
            Decoded::Corrupt { reason } => {
                warn!(%reason, "redoing compiles due to unreadable record");
                CompileRecord::new()
            }
        };

        let current: Vec<&String> = workload
            .binaries()
            .iter()
            .chain(workload.header_libs())
            .collect();
        let diff = KeyDiff::between(record.durations.keys(), current);
        if !diff.is_empty() && diff.unchanged > 0 {
            info!(
                added = diff.added.len(),
                removed = diff.removed.len(),
                "redoing compiles due to mismatched targets"
            );
        }
        record.remove_all(&diff.removed);

        let results = self
            .pool
            .map(&diff.added, |target| self.toolchain.measure_compile(target))?;
        let failure = merge(&diff.added, results, |target, secs| {
            record.insert(target.clone(), secs)
        });

        self.store.save_compiles(&record)?;
        failure.map_or(Ok(record), Err)
    }

    /// Loads the test-run record, measures missing groups, drops stale ones.
    pub fn refresh_testruns(&self, workload: &Workload) -> Result<TestRunRecord, SchedError> {
        let current = workload.groups();
        let mut record = match self.store.load_testruns() {
            Decoded::Record { value, format } => {
                debug!(%format, entries = value.runs.len(), "loaded test-run record");
                if !value.matches_groups(current) {
                    info!("redoing tests due to mismatched test names");
                }
                value
            }
            Decoded::NotFound => {
                info!("redoing tests due to missing record");
                TestRunRecord::default()
            }
            Decoded::Corrupt { reason } => {
                warn!(%reason, "redoing tests due to unreadable record");
                TestRunRecord::default()
            }
        };

        let diff = KeyDiff::between(record.runs.keys(), current);
        record.remove_all(&diff.removed);
        record.groups = current.to_vec();

        // Groups without tests cost nothing and need no subprocess.
        let mut jobs: Vec<(&str, &TestGroup)> = Vec::with_capacity(diff.added.len());
        for group in &diff.added {
            if group.is_empty() {
                record.insert(group.clone(), 0.0);
            } else if let Some(job) = workload.binary_groups().find(|(_, g)| *g == group) {
                jobs.push(job);
            }
        }

        let results = self.pool.map(&jobs, |(binary, group)| {
            self.toolchain.measure_tests(binary, group)
        })?;
        let failure = merge(&jobs, results, |(_, group), secs| {
            record.insert((*group).clone(), secs)
        });

        self.store.save_testruns(&record)?;
        failure.map_or(Ok(record), Err)
    }
}

/// Folds measurement results into a record, returning the first failure.
fn merge<K>(
    keys: &[K],
    results: Vec<Result<Seconds, SchedError>>,
    mut insert: impl FnMut(&K, Seconds),
) -> Option<SchedError> {
    let mut failure = None;
    for (key, result) in keys.iter().zip(results) {
        match result {
            Ok(secs) => insert(key, secs),
            Err(e) => {
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }
    }
    failure
}
