//! The set of targets a scheduling run distributes across bins.

use std::collections::HashSet;

use crate::error::InputError;
use crate::group::TestGroup;

/// Whether a target owns tests or is compiled only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A test binary with an associated (possibly empty) test group.
    Binary,
    /// A header-only library check; compiled but never run.
    HeaderLib,
}

/// Binaries with their positionally aligned test groups, plus header libraries.
///
/// Construction validates that every binary has exactly one group and that no
/// target name is declared twice. Order is preserved everywhere: it is the
/// order in which targets are measured and the order groups are persisted in.
#[derive(Debug, Clone)]
pub struct Workload {
    binaries: Vec<String>,
    groups: Vec<TestGroup>,
    header_libs: Vec<String>,
}

impl Workload {
    /// Builds a workload, checking alignment and uniqueness.
    pub fn new(
        binaries: Vec<String>,
        groups: Vec<TestGroup>,
        header_libs: Vec<String>,
    ) -> Result<Self, InputError> {
        if binaries.len() != groups.len() {
            return Err(InputError::MisalignedGroups {
                binaries: binaries.len(),
                groups: groups.len(),
            });
        }
        let mut seen = HashSet::with_capacity(binaries.len() + header_libs.len());
        for name in binaries.iter().chain(&header_libs) {
            if !seen.insert(name.as_str()) {
                return Err(InputError::DuplicateTarget(name.clone()));
            }
        }
        Ok(Self {
            binaries,
            groups,
            header_libs,
        })
    }

    /// Binary targets in declaration order.
    pub fn binaries(&self) -> &[String] {
        &self.binaries
    }

    /// Test groups, aligned with [`Workload::binaries`].
    pub fn groups(&self) -> &[TestGroup] {
        &self.groups
    }

    /// Header-only library targets in declaration order.
    pub fn header_libs(&self) -> &[String] {
        &self.header_libs
    }

    /// Pairs every binary with its test group.
    pub fn binary_groups(&self) -> impl Iterator<Item = (&str, &TestGroup)> {
        self.binaries.iter().map(String::as_str).zip(&self.groups)
    }

    /// Returns the test group of a binary, or `None` for unknown targets and
    /// header libraries.
    pub fn group_of(&self, binary: &str) -> Option<&TestGroup> {
        self.binaries
            .iter()
            .position(|b| b == binary)
            .map(|i| &self.groups[i])
    }

    /// Classifies a target name.
    pub fn kind_of(&self, target: &str) -> Option<TargetKind> {
        if self.binaries.iter().any(|b| b == target) {
            Some(TargetKind::Binary)
        } else if self.header_libs.iter().any(|h| h == target) {
            Some(TargetKind::HeaderLib)
        } else {
            None
        }
    }

    /// Total number of targets.
    pub fn len(&self) -> usize {
        self.binaries.len() + self.header_libs.len()
    }

    /// Returns `true` if there are no targets at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
