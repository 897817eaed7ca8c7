use crate::paths::resolve_db;
use sentilog_core::{compute_statistics, SentimentStats, StatsConfig};
use sentilog_store::SentimentDb;
use sentilog_text::Tokenizer;
use std::path::Path;

pub fn run(
    db: Option<&Path>,
    neutral: bool,
    top_k: Option<usize>,
    stopwords: Option<&Path>,
) -> anyhow::Result<()> {
    let db_path = resolve_db(db)?;
    let store = SentimentDb::open(&db_path)?;

    let mut config = if neutral {
        StatsConfig::with_neutral()
    } else {
        StatsConfig::new()
    };
    if let Some(k) = top_k {
        config.top_k = k;
    }

    let tokenizer = match stopwords {
        Some(path) => Tokenizer::from_stopword_file(path),
        None => Tokenizer::new(),
    };

    let stats = build_stats(&store, &config, &tokenizer)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

/// One full read-side cycle: snapshot the store once, aggregate from that
/// snapshot. Concurrent appends after the snapshot simply miss this read.
fn build_stats(
    store: &SentimentDb,
    config: &StatsConfig,
    tokenizer: &Tokenizer,
) -> anyhow::Result<SentimentStats> {
    let observations = store.all(None)?;
    let stats = compute_statistics(&observations, config, tokenizer)?;
    Ok(stats)
}
