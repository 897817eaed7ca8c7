//! The aggregation engine: six projections over one observation snapshot
//!
//! Pure function of the snapshot passed in; holds no state across calls.
//! Every projection is zero-filled for the full configured label set, so
//! consumers always see fixed shapes regardless of data sparsity. A record
//! that fails a per-projection precondition (unparsable timestamp,
//! out-of-range score) drops out of the affected projections only, never
//! aborts the batch.

use crate::config::{ConfigError, StatsConfig};
use crate::timebucket::{day_hour_coordinate, hour_bucket_key, parse_timestamp, DAY_NAMES};
use chrono::NaiveDateTime;
use sentilog_store::{Label, Observation};
use sentilog_text::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: Label,
    pub count: u64,
}

/// One count series for one label, parallel to an axis owned by the
/// enclosing structure (bin labels or hour-bucket keys).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSeries {
    pub label: Label,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDistribution {
    /// Bucket labels, `"0.5-0.6"` style, one per bucket.
    pub bins: Vec<String>,
    pub series: Vec<LabelSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordFrequency {
    pub token: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelWordFrequencies {
    pub label: Label,
    /// Top-K tokens, count-descending; ties keep first-encountered order.
    pub words: Vec<WordFrequency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeTrend {
    /// Sorted distinct hour-bucket keys. Each series below is parallel to
    /// this axis; the alignment is part of the output contract.
    pub hours: Vec<String>,
    pub series: Vec<LabelSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelHeatmap {
    pub label: Label,
    /// 7 day-rows (0 = Sunday) by 24 hour-columns, always full-size.
    pub grid: Vec<Vec<u64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heatmap {
    pub days: Vec<String>,
    pub hours: Vec<String>,
    pub series: Vec<LabelHeatmap>,
}

/// One point of the signed trend line: `+score` for positive, `-score`
/// for negative, `0.0` for neutral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: String,
    pub value: f64,
}

/// All six projections, recomputed from scratch on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentStats {
    pub label_counts: Vec<LabelCount>,
    pub score_distribution: ScoreDistribution,
    pub word_frequencies: Vec<LabelWordFrequencies>,
    pub time_trend: TimeTrend,
    pub heatmap: Heatmap,
    pub trend_series: Vec<TrendPoint>,
}

/// Compute every projection from a full observation snapshot.
///
/// Input order does not matter for correctness; time-ordered outputs sort
/// themselves. Configuration problems surface as [`ConfigError`] before
/// any aggregation runs; after that nothing fails.
pub fn compute_statistics(
    observations: &[Observation],
    config: &StatsConfig,
    tokenizer: &Tokenizer,
) -> Result<SentimentStats, ConfigError> {
    config.validate()?;

    let index: HashMap<Label, usize> = config
        .labels
        .iter()
        .enumerate()
        .map(|(i, &label)| (label, i))
        .collect();

    // Observations outside the configured label set would silently
    // under-count every projection; exclude them loudly instead.
    let mut unknown: HashSet<Label> = HashSet::new();
    let in_set: Vec<&Observation> = observations
        .iter()
        .filter(|o| {
            let known = index.contains_key(&o.label);
            if !known {
                unknown.insert(o.label);
            }
            known
        })
        .collect();
    for label in unknown {
        warn!(%label, "observations with this label are outside the configured label set and excluded");
    }

    // Parse timestamps once; a failure drops the record from the three
    // time-based projections only.
    let parsed: Vec<Option<NaiveDateTime>> = in_set
        .iter()
        .map(|o| {
            let ts = parse_timestamp(&o.timestamp);
            if ts.is_none() {
                warn!(row = o.id, timestamp = %o.timestamp, "unparsable timestamp, excluded from time projections");
            }
            ts
        })
        .collect();

    for o in &in_set {
        if !(0.0..=1.0).contains(&o.score) {
            warn!(row = o.id, score = o.score, "out-of-range score, excluded from score projections");
        }
    }

    Ok(SentimentStats {
        label_counts: label_counts(&in_set, config, &index),
        score_distribution: score_distribution(&in_set, config, &index),
        word_frequencies: word_frequencies(&in_set, config, tokenizer),
        time_trend: time_trend(&in_set, &parsed, config, &index),
        heatmap: heatmap(&in_set, &parsed, config, &index),
        trend_series: trend_series(&in_set, &parsed),
    })
}

fn label_counts(
    in_set: &[&Observation],
    config: &StatsConfig,
    index: &HashMap<Label, usize>,
) -> Vec<LabelCount> {
    let mut counts = vec![0u64; config.labels.len()];
    for o in in_set {
        counts[index[&o.label]] += 1;
    }
    config
        .labels
        .iter()
        .zip(counts)
        .map(|(&label, count)| LabelCount { label, count })
        .collect()
}

/// Bucket for a score given the configured edges: half-open `[lo, hi)`,
/// with the final bucket closed so the top edge itself is counted.
fn bucket_index(score: f64, bins: &[f64]) -> Option<usize> {
    let last = bins.len() - 1;
    if score < bins[0] || score > bins[last] {
        return None;
    }
    if score == bins[last] {
        return Some(last - 1);
    }
    bins.windows(2).position(|w| w[0] <= score && score < w[1])
}

fn score_distribution(
    in_set: &[&Observation],
    config: &StatsConfig,
    index: &HashMap<Label, usize>,
) -> ScoreDistribution {
    let bucket_count = config.bins.len() - 1;
    let mut counts = vec![vec![0u64; bucket_count]; config.labels.len()];
    for o in in_set {
        if let Some(bucket) = bucket_index(o.score, &config.bins) {
            counts[index[&o.label]][bucket] += 1;
        }
    }

    ScoreDistribution {
        bins: config
            .bins
            .windows(2)
            .map(|w| format!("{:?}-{:?}", w[0], w[1]))
            .collect(),
        series: config
            .labels
            .iter()
            .zip(counts)
            .map(|(&label, counts)| LabelSeries { label, counts })
            .collect(),
    }
}

fn word_frequencies(
    in_set: &[&Observation],
    config: &StatsConfig,
    tokenizer: &Tokenizer,
) -> Vec<LabelWordFrequencies> {
    config
        .labels
        .iter()
        .map(|&label| {
            // Tally with a first-seen index so ties break deterministically
            // by encounter order, never by hash iteration order.
            let mut counts: HashMap<String, (u64, usize)> = HashMap::new();
            let mut next_seen = 0usize;
            for o in in_set.iter().filter(|o| o.label == label) {
                for token in tokenizer.tokenize(&o.text) {
                    let entry = counts.entry(token).or_insert_with(|| {
                        let idx = next_seen;
                        next_seen += 1;
                        (0, idx)
                    });
                    entry.0 += 1;
                }
            }

            let mut tallies: Vec<(String, u64, usize)> = counts
                .into_iter()
                .map(|(token, (count, seen))| (token, count, seen))
                .collect();
            tallies.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
            tallies.truncate(config.top_k);

            LabelWordFrequencies {
                label,
                words: tallies
                    .into_iter()
                    .map(|(token, count, _)| WordFrequency { token, count })
                    .collect(),
            }
        })
        .collect()
}

fn time_trend(
    in_set: &[&Observation],
    parsed: &[Option<NaiveDateTime>],
    config: &StatsConfig,
    index: &HashMap<Label, usize>,
) -> TimeTrend {
    // BTreeMap keys come out sorted, and the zero-padded key format makes
    // lexicographic order chronological.
    let mut buckets: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    for (o, ts) in in_set.iter().zip(parsed) {
        if let Some(ts) = ts {
            let slot = buckets
                .entry(hour_bucket_key(ts))
                .or_insert_with(|| vec![0; config.labels.len()]);
            slot[index[&o.label]] += 1;
        }
    }

    TimeTrend {
        hours: buckets.keys().cloned().collect(),
        series: config
            .labels
            .iter()
            .enumerate()
            .map(|(i, &label)| LabelSeries {
                label,
                counts: buckets.values().map(|slot| slot[i]).collect(),
            })
            .collect(),
    }
}

fn heatmap(
    in_set: &[&Observation],
    parsed: &[Option<NaiveDateTime>],
    config: &StatsConfig,
    index: &HashMap<Label, usize>,
) -> Heatmap {
    let mut grids = vec![vec![vec![0u64; 24]; 7]; config.labels.len()];
    for (o, ts) in in_set.iter().zip(parsed) {
        if let Some(ts) = ts {
            let (day, hour) = day_hour_coordinate(ts);
            grids[index[&o.label]][day][hour] += 1;
        }
    }

    Heatmap {
        days: DAY_NAMES.iter().map(|d| d.to_string()).collect(),
        hours: (0..24).map(|h| format!("{:02}", h)).collect(),
        series: config
            .labels
            .iter()
            .zip(grids)
            .map(|(&label, grid)| LabelHeatmap { label, grid })
            .collect(),
    }
}

fn trend_series(in_set: &[&Observation], parsed: &[Option<NaiveDateTime>]) -> Vec<TrendPoint> {
    let mut points: Vec<(NaiveDateTime, TrendPoint)> = Vec::new();
    for (o, ts) in in_set.iter().zip(parsed) {
        let Some(ts) = ts else { continue };
        if !(0.0..=1.0).contains(&o.score) {
            continue;
        }
        let value = match o.label {
            Label::Positive => o.score,
            Label::Negative => -o.score,
            Label::Neutral => 0.0,
        };
        points.push((
            *ts,
            TrendPoint {
                timestamp: o.timestamp.clone(),
                value,
            },
        ));
    }
    // Stable sort keeps insertion order within a second
    points.sort_by_key(|(ts, _)| *ts);
    points.into_iter().map(|(_, point)| point).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(timestamp: &str, text: &str, label: Label, score: f64) -> Observation {
        Observation {
            id: 0,
            timestamp: timestamp.to_string(),
            text: text.to_string(),
            label,
            score,
        }
    }

    fn compute(observations: &[Observation], config: &StatsConfig) -> SentimentStats {
        compute_statistics(observations, config, &Tokenizer::new()).unwrap()
    }

    fn scenario() -> Vec<Observation> {
        let t = "2025-06-01 12:00:00";
        vec![
            obs(t, "good product", Label::Positive, 0.95),
            obs(t, "bad product", Label::Negative, 0.80),
            obs(t, "good service", Label::Positive, 0.55),
        ]
    }

    #[test]
    fn test_scenario_label_counts() {
        let stats = compute(&scenario(), &StatsConfig::new());
        assert_eq!(stats.label_counts[0].label, Label::Positive);
        assert_eq!(stats.label_counts[0].count, 2);
        assert_eq!(stats.label_counts[1].label, Label::Negative);
        assert_eq!(stats.label_counts[1].count, 1);
    }

    #[test]
    fn test_scenario_score_distribution() {
        let stats = compute(&scenario(), &StatsConfig::new());
        let dist = &stats.score_distribution;
        assert_eq!(dist.bins, vec!["0.5-0.6", "0.6-0.7", "0.7-0.8", "0.8-0.9", "0.9-1.0"]);
        assert_eq!(dist.series[0].counts, vec![1, 0, 0, 0, 1]); // positive
        assert_eq!(dist.series[1].counts, vec![0, 0, 0, 1, 0]); // negative
    }

    #[test]
    fn test_scenario_word_frequencies() {
        let stats = compute(&scenario(), &StatsConfig::new());
        let positive = &stats.word_frequencies[0];
        assert_eq!(positive.label, Label::Positive);
        // good:2 first; product and service tie at 1, product seen first
        assert_eq!(positive.words[0].token, "good");
        assert_eq!(positive.words[0].count, 2);
        assert_eq!(positive.words[1].token, "product");
        assert_eq!(positive.words[2].token, "service");
    }

    #[test]
    fn test_word_frequency_tie_break_is_encounter_order() {
        let config = StatsConfig::new();
        let observations = vec![obs(
            "2025-06-01 12:00:00",
            "wonderful amazing delightful",
            Label::Positive,
            0.9,
        )];
        for _ in 0..10 {
            let stats = compute(&observations, &config);
            let tokens: Vec<_> = stats.word_frequencies[0]
                .words
                .iter()
                .map(|w| w.token.as_str())
                .collect();
            assert_eq!(tokens, vec!["wonderful", "amazing", "delightful"]);
        }
    }

    #[test]
    fn test_top_k_bounds_table() {
        let config = StatsConfig {
            top_k: 2,
            ..StatsConfig::new()
        };
        let stats = compute(&scenario(), &config);
        assert_eq!(stats.word_frequencies[0].words.len(), 2);
        assert_eq!(stats.word_frequencies[0].words[0].token, "good");
    }

    #[test]
    fn test_empty_input_has_fixed_shapes() {
        let config = StatsConfig::new();
        let stats = compute(&[], &config);

        assert_eq!(stats.label_counts.len(), 2);
        assert!(stats.label_counts.iter().all(|c| c.count == 0));

        assert_eq!(stats.score_distribution.bins.len(), 5);
        assert_eq!(stats.score_distribution.series.len(), 2);
        assert!(stats
            .score_distribution
            .series
            .iter()
            .all(|s| s.counts == vec![0; 5]));

        assert_eq!(stats.word_frequencies.len(), 2);
        assert!(stats.word_frequencies.iter().all(|w| w.words.is_empty()));

        assert!(stats.time_trend.hours.is_empty());
        assert_eq!(stats.time_trend.series.len(), 2);
        assert!(stats.time_trend.series.iter().all(|s| s.counts.is_empty()));

        assert_eq!(stats.heatmap.days.len(), 7);
        assert_eq!(stats.heatmap.hours.len(), 24);
        assert_eq!(stats.heatmap.series.len(), 2);
        for series in &stats.heatmap.series {
            assert_eq!(series.grid.len(), 7);
            assert!(series.grid.iter().all(|row| row.len() == 24));
            assert!(series.grid.iter().flatten().all(|&c| c == 0));
        }

        assert!(stats.trend_series.is_empty());
    }

    #[test]
    fn test_score_one_falls_in_last_bucket() {
        let config = StatsConfig::new();
        let observations = vec![obs("2025-06-01 12:00:00", "perfect", Label::Positive, 1.0)];
        let stats = compute(&observations, &config);
        assert_eq!(stats.score_distribution.series[0].counts, vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_bucket_index_edges() {
        let bins = [0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
        assert_eq!(bucket_index(0.5, &bins), Some(0));
        assert_eq!(bucket_index(0.6, &bins), Some(1));
        assert_eq!(bucket_index(0.95, &bins), Some(4));
        assert_eq!(bucket_index(1.0, &bins), Some(4));
        assert_eq!(bucket_index(0.49, &bins), None);
        assert_eq!(bucket_index(1.01, &bins), None);
    }

    #[test]
    fn test_distribution_mass_equals_label_count() {
        // All scores inside the bin range, so every record lands somewhere
        let config = StatsConfig::new();
        let t = "2025-06-03 08:00:00";
        let observations = vec![
            obs(t, "a1", Label::Positive, 0.5),
            obs(t, "a2", Label::Positive, 0.72),
            obs(t, "a3", Label::Positive, 1.0),
            obs(t, "b1", Label::Negative, 0.9),
        ];
        let stats = compute(&observations, &config);
        for (count, series) in stats
            .label_counts
            .iter()
            .zip(&stats.score_distribution.series)
        {
            assert_eq!(series.counts.iter().sum::<u64>(), count.count);
        }
    }

    #[test]
    fn test_heatmap_mass_equals_label_count() {
        let config = StatsConfig::new();
        let observations = vec![
            obs("2025-06-01 00:00:00", "sun early", Label::Positive, 0.9),
            obs("2025-06-08 00:30:00", "sun next week", Label::Positive, 0.9),
            obs("2025-06-04 15:00:00", "wed", Label::Negative, 0.8),
        ];
        let stats = compute(&observations, &config);
        for (count, series) in stats.label_counts.iter().zip(&stats.heatmap.series) {
            let mass: u64 = series.grid.iter().flatten().sum();
            assert_eq!(mass, count.count);
        }
        // Two different Sundays accumulate in the same cell
        assert_eq!(stats.heatmap.series[0].grid[0][0], 2);
    }

    #[test]
    fn test_time_trend_zero_fills_existing_buckets() {
        let config = StatsConfig::new();
        let observations = vec![
            obs("2025-06-01 09:10:00", "morning good", Label::Positive, 0.9),
            obs("2025-06-01 10:20:00", "later bad", Label::Negative, 0.8),
        ];
        let stats = compute(&observations, &config);
        assert_eq!(stats.time_trend.hours, vec!["2025-06-01 09", "2025-06-01 10"]);
        assert_eq!(stats.time_trend.series[0].counts, vec![1, 0]); // positive
        assert_eq!(stats.time_trend.series[1].counts, vec![0, 1]); // negative
    }

    #[test]
    fn test_unsorted_input_is_tolerated() {
        let config = StatsConfig::new();
        let observations = vec![
            obs("2025-06-02 10:00:00", "second", Label::Positive, 0.9),
            obs("2025-06-01 10:00:00", "first", Label::Negative, 0.8),
        ];
        let stats = compute(&observations, &config);
        assert_eq!(stats.time_trend.hours, vec!["2025-06-01 10", "2025-06-02 10"]);
        assert_eq!(stats.trend_series[0].timestamp, "2025-06-01 10:00:00");
        assert_eq!(stats.trend_series[1].timestamp, "2025-06-02 10:00:00");
    }

    #[test]
    fn test_trend_series_sign_convention() {
        let config = StatsConfig::with_neutral();
        let observations = vec![
            obs("2025-06-01 09:00:00", "good", Label::Positive, 0.9),
            obs("2025-06-01 10:00:00", "bad", Label::Negative, 0.8),
            obs("2025-06-01 11:00:00", "meh", Label::Neutral, 0.7),
        ];
        let stats = compute(&observations, &config);
        let values: Vec<f64> = stats.trend_series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0.9, -0.8, 0.0]);
    }

    #[test]
    fn test_bad_timestamp_poisons_time_projections_only() {
        let config = StatsConfig::new();
        let observations = vec![
            obs("2025-06-01 09:00:00", "fine", Label::Positive, 0.9),
            obs("garbage", "broken clock but valid text", Label::Positive, 0.7),
        ];
        let stats = compute(&observations, &config);

        // Counted where the timestamp is not needed
        assert_eq!(stats.label_counts[0].count, 2);
        assert_eq!(stats.score_distribution.series[0].counts.iter().sum::<u64>(), 2);
        let word_total: u64 = stats.word_frequencies[0].words.iter().map(|w| w.count).sum();
        assert!(word_total > 1);

        // Excluded where it is
        assert_eq!(stats.time_trend.hours.len(), 1);
        assert_eq!(stats.time_trend.series[0].counts, vec![1]);
        assert_eq!(stats.heatmap.series[0].grid.iter().flatten().sum::<u64>(), 1);
        assert_eq!(stats.trend_series.len(), 1);
    }

    #[test]
    fn test_bad_score_poisons_score_projections_only() {
        let config = StatsConfig::new();
        let observations = vec![
            obs("2025-06-01 09:00:00", "fine", Label::Positive, 0.9),
            obs("2025-06-01 09:05:00", "corrupt score", Label::Positive, 1.7),
        ];
        let stats = compute(&observations, &config);

        assert_eq!(stats.label_counts[0].count, 2);
        assert_eq!(stats.time_trend.series[0].counts, vec![2]);
        assert_eq!(stats.score_distribution.series[0].counts.iter().sum::<u64>(), 1);
        assert_eq!(stats.trend_series.len(), 1);
    }

    #[test]
    fn test_out_of_set_label_excluded_everywhere() {
        let config = StatsConfig::new(); // no Neutral
        let observations = vec![obs("2025-06-01 09:00:00", "meh", Label::Neutral, 0.6)];
        let stats = compute(&observations, &config);
        assert!(stats.label_counts.iter().all(|c| c.count == 0));
        assert!(stats.time_trend.hours.is_empty());
        assert!(stats.trend_series.is_empty());
    }

    #[test]
    fn test_neutral_label_zero_filled_when_configured() {
        let config = StatsConfig::with_neutral();
        let stats = compute(&scenario(), &config);
        assert_eq!(stats.label_counts.len(), 3);
        assert_eq!(stats.label_counts[2].label, Label::Neutral);
        assert_eq!(stats.label_counts[2].count, 0);
        // Empty table, not an absent entry
        assert_eq!(stats.word_frequencies[2].label, Label::Neutral);
        assert!(stats.word_frequencies[2].words.is_empty());
    }

    #[test]
    fn test_idempotent_over_same_snapshot() {
        let config = StatsConfig::new();
        let observations = scenario();
        let first = compute(&observations, &config);
        let second = compute(&observations, &config);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_invalid_config_fails_before_aggregation() {
        let config = StatsConfig {
            bins: vec![0.9, 0.5],
            ..StatsConfig::new()
        };
        let result = compute_statistics(&scenario(), &config, &Tokenizer::new());
        assert!(matches!(
            result,
            Err(ConfigError::NonIncreasingBins { .. })
        ));
    }

    #[test]
    fn test_serialized_time_trend_stays_parallel() {
        let config = StatsConfig::new();
        let observations = vec![
            obs("2025-06-01 09:00:00", "one", Label::Positive, 0.9),
            obs("2025-06-01 11:00:00", "two", Label::Negative, 0.8),
        ];
        let stats = compute(&observations, &config);
        let value = serde_json::to_value(&stats).unwrap();
        let hours = value["time_trend"]["hours"].as_array().unwrap();
        for series in value["time_trend"]["series"].as_array().unwrap() {
            assert_eq!(series["counts"].as_array().unwrap().len(), hours.len());
        }
    }
}
