//! Summary statistics of bin volumes, for humans watching CI.

use std::fmt;

use testbin_common::Seconds;

use crate::partition::Bin;

/// Bin volume statistics relative to the per-worker wall-clock budget.
///
/// All percentages are `volume / budget * 100`. The standard deviation is
/// the sample deviation and 0 for fewer than two bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinStats {
    /// Number of bins.
    pub count: usize,
    /// Smallest bin volume, percent of budget.
    pub min: f64,
    /// Largest bin volume, percent of budget.
    pub max: f64,
    /// Mean bin volume, percent of budget.
    pub mean: f64,
    /// Standard deviation of bin volumes, percent of budget.
    pub stdev: f64,
}

impl BinStats {
    /// Computes statistics over `bins` against a budget of `max_time` seconds.
    pub fn compute(bins: &[Bin], max_time: Seconds) -> Self {
        let norm = if max_time > 0.0 { 100.0 / max_time } else { 0.0 };
        let vols: Vec<f64> = bins.iter().map(|b| b.volume() * norm).collect();
        if vols.is_empty() {
            return Self {
                count: 0,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                stdev: 0.0,
            };
        }

        let n = vols.len() as f64;
        let mean = vols.iter().sum::<f64>() / n;
        let stdev = if vols.len() > 1 {
            let var = vols.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };

        Self {
            count: vols.len(),
            min: vols.iter().copied().fold(f64::INFINITY, f64::min),
            max: vols.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean,
            stdev,
        }
    }
}

impl fmt::Display for BinStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generated {} bins.", self.count)?;
        writeln!(f, "Relative volumes:")?;
        writeln!(f, "\t\tMin {:.2}%", self.min)?;
        writeln!(f, "\t\tMax {:.2}%", self.max)?;
        writeln!(f, "\t\tAvg {:.2}%", self.mean)?;
        write!(f, "\t\tStd {:.2}%", self.stdev)
    }
}
