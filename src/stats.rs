//! Reduction of trial results into the seen percentage and the two
//! distance distributions (seen / not seen).

use serde::{Deserialize, Serialize};

use crate::error::StatsError;
use crate::trial::TrialResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub trials: usize,
    pub seen: usize,
    pub seen_percent: f64,
    pub seen_distances: Vec<f64>,
    pub unseen_distances: Vec<f64>,
}

impl Summary {
    /// Histograms of the seen and not-seen distances, `None` where a
    /// side has no samples.
    pub fn histograms(&self, bins: usize) -> (Option<Histogram>, Option<Histogram>) {
        (
            Histogram::from_samples(&self.seen_distances, bins),
            Histogram::from_samples(&self.unseen_distances, bins),
        )
    }
}

/// `seen_percent = 100 * visible / total`. An empty result set has no
/// defined percentage and is reported as `EmptyResultSet`.
pub fn summarize(results: &[TrialResult]) -> Result<Summary, StatsError> {
    if results.is_empty() {
        return Err(StatsError::EmptyResultSet);
    }
    let mut seen_distances = Vec::new();
    let mut unseen_distances = Vec::new();
    for r in results {
        if r.visible {
            seen_distances.push(r.distance);
        } else {
            unseen_distances.push(r.distance);
        }
    }
    let seen = seen_distances.len();
    Ok(Summary {
        trials: results.len(),
        seen,
        seen_percent: seen as f64 * 100.0 / results.len() as f64,
        seen_distances,
        unseen_distances,
    })
}

/// Equal-width bins over `[min, max]` of the samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub min: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// The max sample lands in the last bin. A zero-width range puts
    /// everything in the first bin.
    pub fn from_samples(samples: &[f64], bins: usize) -> Option<Histogram> {
        if samples.is_empty() || bins == 0 {
            return None;
        }
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let bin_width = (max - min) / bins as f64;
        let mut counts = vec![0; bins];
        for &s in samples {
            let idx = if bin_width > 0.0 {
                (((s - min) / bin_width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[idx] += 1;
        }
        Some(Histogram {
            min,
            bin_width,
            counts,
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Lower edge of bin `i`.
    pub fn bin_start(&self, i: usize) -> f64 {
        self.min + self.bin_width * i as f64
    }
}
