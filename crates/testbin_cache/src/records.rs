//! Record types persisted between scheduling runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use testbin_common::{Seconds, TestGroup};

/// Compile duration per target (binaries and header libraries alike).
///
/// Serialized as a plain JSON object `{ "target": seconds, ... }` with keys in
/// sorted order, so rewriting an unchanged record produces identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompileRecord {
    /// Seconds spent compiling each target.
    pub durations: BTreeMap<String, Seconds>,
}

impl CompileRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compile time of a target.
    pub fn get(&self, target: &str) -> Option<Seconds> {
        self.durations.get(target).copied()
    }

    /// Records the compile time of a target, replacing any previous value.
    pub fn insert(&mut self, target: impl Into<String>, seconds: Seconds) {
        self.durations.insert(target.into(), seconds);
    }

    /// Drops the entries for the given targets.
    pub fn remove_all<'a>(&mut self, targets: impl IntoIterator<Item = &'a String>) {
        for target in targets {
            self.durations.remove(target);
        }
    }

    /// Number of targets with a recorded compile time.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

/// Summed test-run duration per test group, stored with the group list that
/// produced it.
///
/// The `groups` list is compared against the current list of groups on load;
/// the `runs` map holds one entry per distinct group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRunRecord {
    /// Ordered per-binary test groups at the time the record was written.
    pub groups: Vec<TestGroup>,

    /// Seconds spent running all tests of each group.
    pub runs: BTreeMap<TestGroup, Seconds>,
}

impl TestRunRecord {
    /// Creates an empty record for the given group list.
    pub fn new(groups: Vec<TestGroup>) -> Self {
        Self {
            groups,
            runs: BTreeMap::new(),
        }
    }

    /// Returns the run time of a group.
    pub fn get(&self, group: &TestGroup) -> Option<Seconds> {
        self.runs.get(group).copied()
    }

    /// Records the run time of a group.
    pub fn insert(&mut self, group: TestGroup, seconds: Seconds) {
        self.runs.insert(group, seconds);
    }

    /// Drops the entries for the given groups.
    pub fn remove_all<'a>(&mut self, groups: impl IntoIterator<Item = &'a TestGroup>) {
        for group in groups {
            self.runs.remove(group);
        }
    }

    /// Returns `true` if the stored group list equals `groups`, order included.
    pub fn matches_groups(&self, groups: &[TestGroup]) -> bool {
        self.groups == groups
    }
}

/// Combined cost per target: compile time plus, for binaries, test-run time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Totals {
    /// Total seconds per target.
    pub costs: BTreeMap<String, Seconds>,
}

impl Totals {
    /// Creates an empty totals map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total cost of a target.
    pub fn get(&self, target: &str) -> Option<Seconds> {
        self.costs.get(target).copied()
    }

    /// Sets the total cost of a target.
    pub fn insert(&mut self, target: impl Into<String>, seconds: Seconds) {
        self.costs.insert(target.into(), seconds);
    }

    /// Iterates over `(target, cost)` pairs in target-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Seconds)> {
        self.costs.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all costs.
    pub fn sum(&self) -> Seconds {
        self.costs.values().sum()
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Returns `true` if there are no targets.
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl FromIterator<(String, Seconds)> for Totals {
    fn from_iter<I: IntoIterator<Item = (String, Seconds)>>(iter: I) -> Self {
        Self {
            costs: iter.into_iter().collect(),
        }
    }
}
