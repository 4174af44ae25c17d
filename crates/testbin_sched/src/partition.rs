//! Packing per-target costs into bins.
//!
//! The default policy balances a fixed number of bins with the greedy
//! longest-processing-time rule. The constant-volume policy fills bins up to
//! a wall-clock budget instead and lets the number of bins follow.

use std::cmp::Ordering;

use testbin_cache::Totals;
use testbin_common::Seconds;
use testbin_config::BinPolicy;

/// A group of targets built and tested together on one CI worker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bin {
    items: Vec<(String, Seconds)>,
    volume: Seconds,
}

impl Bin {
    /// Adds a target to the bin.
    pub fn push(&mut self, target: impl Into<String>, cost: Seconds) {
        self.items.push((target.into(), cost));
        self.volume += cost;
    }

    /// Targets in the order they were assigned.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(t, _)| t.as_str())
    }

    /// Returns `true` if the target was assigned to this bin.
    pub fn contains(&self, target: &str) -> bool {
        self.items.iter().any(|(t, _)| t == target)
    }

    /// Sum of the costs of all targets in the bin.
    pub fn volume(&self) -> Seconds {
        self.volume
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no target was assigned.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Targets by descending cost; equal costs by ascending name.
fn by_descending_cost(totals: &Totals) -> Vec<(&str, Seconds)> {
    let mut items: Vec<(&str, Seconds)> = totals.iter().collect();
    items.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(b.0),
        other => other,
    });
    items
}

/// Distributes targets over exactly `bin_count` bins.
///
/// Each target, most expensive first, goes to the currently least-loaded bin
/// (the lowest index among equals). Bins stay empty when there are fewer
/// targets than bins. A `bin_count` of 0 is treated as 1.
pub fn partition(totals: &Totals, bin_count: usize) -> Vec<Bin> {
    let mut bins = vec![Bin::default(); bin_count.max(1)];
    for (target, cost) in by_descending_cost(totals) {
        let mut lightest = 0;
        for (idx, bin) in bins.iter().enumerate().skip(1) {
            if bin.volume < bins[lightest].volume {
                lightest = idx;
            }
        }
        bins[lightest].push(target, cost);
    }
    bins
}

/// Distributes targets over as many bins as needed to keep each bin's volume
/// at or below `max_volume`.
///
/// First-fit decreasing: each target, most expensive first, goes into the
/// first bin it fits in, or opens a new bin. A target costing more than
/// `max_volume` on its own gets a bin to itself.
pub fn partition_by_volume(totals: &Totals, max_volume: Seconds) -> Vec<Bin> {
    let mut bins: Vec<Bin> = Vec::new();
    for (target, cost) in by_descending_cost(totals) {
        match bins.iter_mut().find(|b| b.volume + cost <= max_volume) {
            Some(bin) => bin.push(target, cost),
            None => {
                let mut bin = Bin::default();
                bin.push(target, cost);
                bins.push(bin);
            }
        }
    }
    bins
}

/// Packs targets according to the configured policy.
pub fn pack(totals: &Totals, policy: BinPolicy, bin_count: usize, max_time: Seconds) -> Vec<Bin> {
    match policy {
        BinPolicy::ConstantBinCount => partition(totals, bin_count),
        BinPolicy::ConstantVolume => partition_by_volume(totals, max_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn totals(items: &[(&str, Seconds)]) -> Totals {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn assert_covers_exactly(bins: &[Bin], t: &Totals) {
        let mut seen = HashSet::new();
        for bin in bins {
            for target in bin.targets() {
                assert!(seen.insert(target.to_string()), "{target} assigned twice");
            }
        }
        let expected: HashSet<String> = t.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn greedy_two_bins() {
        let t = totals(&[("a", 13.0), ("b", 6.0), ("h1", 2.0)]);
        let bins = partition(&t, 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].targets().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(bins[1].targets().collect::<Vec<_>>(), vec!["b", "h1"]);
        assert_eq!(bins[0].volume(), 13.0);
        assert_eq!(bins[1].volume(), 8.0);
    }

    #[test]
    fn more_bins_than_targets_leaves_empty_bins() {
        let t = totals(&[("a", 1.0), ("b", 2.0)]);
        let bins = partition(&t, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().filter(|b| b.is_empty()).count(), 3);
        assert_covers_exactly(&bins, &t);
    }

    #[test]
    fn zero_bins_treated_as_one() {
        let t = totals(&[("a", 1.0), ("b", 2.0)]);
        let bins = partition(&t, 0);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].len(), 2);
    }

    #[test]
    fn no_targets() {
        let bins = partition(&Totals::new(), 3);
        assert_eq!(bins.len(), 3);
        assert!(bins.iter().all(Bin::is_empty));
        assert!(partition_by_volume(&Totals::new(), 10.0).is_empty());
    }

    #[test]
    fn equal_costs_are_ordered_by_name() {
        let t = totals(&[("z", 1.0), ("m", 1.0), ("a", 1.0)]);
        let bins = partition(&t, 3);
        assert!(bins[0].contains("a"));
        assert!(bins[1].contains("m"));
        assert!(bins[2].contains("z"));
    }

    #[test]
    fn greedy_balance_bound_holds_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(0x7e57_b1);
        for _ in 0..200 {
            let n = rng.gen_range(1..40);
            let k = rng.gen_range(1..=n);
            let t: Totals = (0..n)
                .map(|i| (format!("t{i}"), rng.gen_range(0.0..600.0)))
                .collect();

            let bins = partition(&t, k);
            assert_eq!(bins.len(), k);
            assert_covers_exactly(&bins, &t);

            // The heaviest bin was the lightest when its last item arrived,
            // so the spread never exceeds that item. For a bin holding more
            // than one item, that item came after the first round.
            let sorted = by_descending_cost(&t);
            let max = bins.iter().map(Bin::volume).fold(f64::MIN, f64::max);
            let min = bins.iter().map(Bin::volume).fold(f64::MAX, f64::min);
            let heaviest = bins
                .iter()
                .max_by(|a, b| a.volume().total_cmp(&b.volume()))
                .unwrap();
            let bound = if heaviest.len() > 1 {
                sorted.get(k).map_or(0.0, |(_, c)| *c)
            } else {
                sorted[0].1
            };
            assert!(
                max - min <= bound + 1e-9,
                "spread {} exceeds bound {bound}",
                max - min
            );
        }
    }

    #[test]
    fn volume_policy_respects_cap() {
        let t = totals(&[("a", 6.0), ("b", 5.0), ("c", 4.0), ("d", 3.0), ("e", 2.0)]);
        let bins = partition_by_volume(&t, 10.0);
        assert_covers_exactly(&bins, &t);
        assert!(bins.iter().all(|b| b.volume() <= 10.0));
        // a+c, b+d+e
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].targets().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(bins[1].targets().collect::<Vec<_>>(), vec!["b", "d", "e"]);
    }

    #[test]
    fn oversized_target_gets_own_bin() {
        let t = totals(&[("huge", 50.0), ("small", 1.0)]);
        let bins = partition_by_volume(&t, 10.0);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].targets().collect::<Vec<_>>(), vec!["huge"]);
        assert_eq!(bins[1].targets().collect::<Vec<_>>(), vec!["small"]);
    }

    #[test]
    fn pack_dispatches_on_policy() {
        let t = totals(&[("a", 6.0), ("b", 5.0)]);
        assert_eq!(pack(&t, BinPolicy::ConstantBinCount, 4, 10.0).len(), 4);
        assert_eq!(pack(&t, BinPolicy::ConstantVolume, 4, 100.0).len(), 1);
    }
}
