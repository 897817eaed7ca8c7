//! Aggregation configuration

use sentilog_store::Label;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("label set must not be empty")]
    EmptyLabelSet,
    #[error("label set contains {0} more than once")]
    DuplicateLabel(Label),
    #[error("need at least two histogram bin edges, got {0}")]
    TooFewBinEdges(usize),
    #[error("bin edges must be strictly increasing (edge {index} is {value})")]
    NonIncreasingBins { index: usize, value: f64 },
    #[error("bin edge {0} outside [0, 1]")]
    BinEdgeOutOfRange(f64),
    #[error("top_k must be at least 1")]
    ZeroTopK,
}

/// Configuration shared by the classifier adapter and the aggregation
/// engine. The label set is closed and ordered; every projection is keyed
/// by it, so an observation carrying a label outside this set is excluded
/// everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Active labels, in presentation order.
    pub labels: Vec<Label>,

    /// Histogram bin edges over the score range, strictly increasing,
    /// within [0, 1]. Buckets are half-open `[lo, hi)` except the last,
    /// which is closed so a score of exactly 1.0 is counted.
    pub bins: Vec<f64>,

    /// Size bound for each per-label word-frequency table.
    pub top_k: usize,
}

impl StatsConfig {
    pub fn new() -> Self {
        Self {
            labels: vec![Label::Positive, Label::Negative],
            bins: vec![0.5, 0.6, 0.7, 0.8, 0.9, 1.0],
            top_k: 20,
        }
    }

    /// Default configuration extended with the neutral label.
    pub fn with_neutral() -> Self {
        Self {
            labels: vec![Label::Positive, Label::Negative, Label::Neutral],
            ..Self::new()
        }
    }

    /// Validate before any aggregation; every projection depends on these
    /// invariants, so violations are fatal rather than skippable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.labels.is_empty() {
            return Err(ConfigError::EmptyLabelSet);
        }
        for (i, label) in self.labels.iter().enumerate() {
            if self.labels[..i].contains(label) {
                return Err(ConfigError::DuplicateLabel(*label));
            }
        }
        if self.bins.len() < 2 {
            return Err(ConfigError::TooFewBinEdges(self.bins.len()));
        }
        for (i, &edge) in self.bins.iter().enumerate() {
            if !(0.0..=1.0).contains(&edge) {
                return Err(ConfigError::BinEdgeOutOfRange(edge));
            }
            if i > 0 && edge <= self.bins[i - 1] {
                return Err(ConfigError::NonIncreasingBins {
                    index: i,
                    value: edge,
                });
            }
        }
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        Ok(())
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self::new()
    }
}
