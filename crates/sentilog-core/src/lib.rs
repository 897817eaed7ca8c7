//! Statistics aggregation over classified observations

mod config;
mod stats;
pub mod timebucket;

pub use config::{ConfigError, StatsConfig};
pub use stats::{
    compute_statistics, Heatmap, LabelCount, LabelHeatmap, LabelSeries, LabelWordFrequencies,
    ScoreDistribution, SentimentStats, TimeTrend, TrendPoint, WordFrequency,
};
