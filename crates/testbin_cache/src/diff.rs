//! Key-set comparison between a cached record and the current workload.

use std::collections::HashSet;
use std::hash::Hash;

/// Difference between the keys of a cached record and the current key set.
///
/// `added` keeps the order of the current key set so that measurements are
/// dispatched in declaration order; `removed` keeps the cached order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDiff<K> {
    /// Keys that are current but have no cached entry.
    pub added: Vec<K>,

    /// Keys with a cached entry that are no longer current.
    pub removed: Vec<K>,

    /// Number of keys present in both.
    pub unchanged: usize,
}

impl<K: Eq + Hash + Clone> KeyDiff<K> {
    /// Compares cached keys against current keys.
    pub fn between<'a, C, U>(cached: C, current: U) -> Self
    where
        K: 'a,
        C: IntoIterator<Item = &'a K>,
        U: IntoIterator<Item = &'a K>,
    {
        let cached: Vec<&K> = cached.into_iter().collect();
        let cached_set: HashSet<&K> = cached.iter().copied().collect();

        let mut added = Vec::new();
        let mut current_set = HashSet::new();
        let mut unchanged = 0;
        for key in current {
            if !current_set.insert(key) {
                continue;
            }
            if cached_set.contains(key) {
                unchanged += 1;
            } else {
                added.push(key.clone());
            }
        }

        let removed = cached
            .into_iter()
            .filter(|k| !current_set.contains(k))
            .cloned()
            .collect();

        Self {
            added,
            removed,
            unchanged,
        }
    }

    /// Returns `true` if the key sets are equal.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
