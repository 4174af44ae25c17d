//! Test groups: the ordered test names owned by one binary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The tests belonging to a single binary, stored in their joined form.
///
/// The joined string (names separated by [`TestGroup::SEPARATOR`]) is the
/// identity of the group: it is the key under which test-run durations are
/// persisted, so any change to the names or their order yields a new group.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestGroup(String);

impl TestGroup {
    /// Separator between test names inside a group.
    pub const SEPARATOR: char = ';';

    /// Wraps an already-joined group string.
    pub fn new(joined: impl Into<String>) -> Self {
        Self(joined.into())
    }

    /// Returns the joined form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the test names, skipping empty entries.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0
            .split(Self::SEPARATOR)
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Returns `true` if the group holds no test names.
    pub fn is_empty(&self) -> bool {
        self.names().next().is_none()
    }
}

impl fmt::Display for TestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestGroup({:?})", self.0)
    }
}
