//! Completion-day histories keyed by cadence, with summary statistics.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::numbers::{u64_to_f64, usize_to_f64};

/// Summary statistics for one cadence. Variance is the population variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CadenceSummary {
    pub count: usize,
    pub average_days: f64,
    pub variance: f64,
    pub stddev: f64,
}

impl CadenceSummary {
    /// Compute statistics over a history. `None` for an empty slice.
    #[must_use]
    pub fn from_history(history: &[u64]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }
        let count = history.len();
        let n = usize_to_f64(count);
        let average_days = history.iter().copied().map(u64_to_f64).sum::<f64>() / n;
        let variance = history
            .iter()
            .map(|&day| (average_days - u64_to_f64(day)).powi(2))
            .sum::<f64>()
            / n;
        Some(Self {
            count,
            average_days,
            variance,
            stddev: variance.sqrt(),
        })
    }
}

/// Append-only completion histories. Only [`ScoreAggregator::reset`] clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAggregator {
    histories: BTreeMap<u32, Vec<u64>>,
}

impl ScoreAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, cadence: u32, completion_day: u64) {
        self.histories
            .entry(cadence)
            .or_default()
            .push(completion_day);
    }

    pub fn reset(&mut self) {
        self.histories.clear();
    }

    #[must_use]
    pub fn history(&self, cadence: u32) -> Option<&[u64]> {
        self.histories.get(&cadence).map(Vec::as_slice)
    }

    #[must_use]
    pub fn cadences(&self) -> Vec<u32> {
        self.histories.keys().copied().collect()
    }

    #[must_use]
    pub fn total_recorded(&self) -> usize {
        self.histories.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// Statistics for every cadence with at least one completion.
    #[must_use]
    pub fn summarize(&self) -> BTreeMap<u32, CadenceSummary> {
        self.histories
            .iter()
            .filter_map(|(&cadence, history)| {
                CadenceSummary::from_history(history).map(|summary| (cadence, summary))
            })
            .collect()
    }
}
