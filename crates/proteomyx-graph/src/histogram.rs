//! Edge-score distribution over a fixed [0, 1000] domain.

use serde::Serialize;

use crate::filter::Threshold;
use crate::model::Edge;

pub const HISTOGRAM_BINS: usize = 20;
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 1000.0;
pub const BIN_WIDTH: f64 = (SCORE_MAX - SCORE_MIN) / HISTOGRAM_BINS as f64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// Bin start as an integer, used as the axis label.
    pub label: String,
}

impl HistogramBin {
    /// Bins that still contribute edges at `threshold` are drawn highlighted.
    pub fn is_above(&self, threshold: Threshold) -> bool {
        self.end > threshold.value()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreHistogram {
    pub bins: Vec<HistogramBin>,
}

impl ScoreHistogram {
    /// All twenty bins with zero counts.
    pub fn empty() -> Self {
        let bins = (0..HISTOGRAM_BINS)
            .map(|i| {
                let start = SCORE_MIN + i as f64 * BIN_WIDTH;
                HistogramBin {
                    start,
                    end: SCORE_MIN + (i + 1) as f64 * BIN_WIDTH,
                    count: 0,
                    label: format!("{:.0}", start),
                }
            })
            .collect();
        Self { bins }
    }

    /// Bins every edge regardless of any threshold.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        let mut histogram = Self::empty();
        for edge in edges {
            histogram.bins[bin_index(edge.score())].count += 1;
        }
        histogram
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Threshold selected by clicking the bar at `index`: the bin's start.
    pub fn threshold_for_bin(&self, index: usize) -> Option<Threshold> {
        self.bins.get(index).and_then(|b| Threshold::new(b.start).ok())
    }
}

/// Bin for `score`. Scores at or above the domain end land in the last bin,
/// negative scores in the first.
pub fn bin_index(score: f64) -> usize {
    let raw = ((score - SCORE_MIN) / BIN_WIDTH).floor();
    if raw.is_nan() || raw < 0.0 {
        return 0;
    }
    (raw as usize).min(HISTOGRAM_BINS - 1)
}
