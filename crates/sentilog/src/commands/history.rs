use crate::paths::resolve_db;
use sentilog_store::{Label, Observation, SentimentDb};
use std::path::Path;

pub fn run(db: Option<&Path>, label: Option<&str>, limit: usize) -> anyhow::Result<()> {
    let filter = label.map(|l| l.parse::<Label>()).transpose()?;
    let db_path = resolve_db(db)?;
    let store = SentimentDb::open(&db_path)?;

    let observations = store.all(filter)?;
    if observations.is_empty() {
        println!("No observations recorded");
        return Ok(());
    }

    let recent: Vec<&Observation> = observations.iter().rev().take(limit).collect();
    println!("Recent observations (last {})", recent.len());
    println!("==============================");
    for obs in recent {
        println!("{}", format_line(obs));
    }
    Ok(())
}

fn format_line(obs: &Observation) -> String {
    let text: String = if obs.text.chars().count() > 60 {
        let truncated: String = obs.text.chars().take(57).collect();
        format!("{}...", truncated)
    } else {
        obs.text.clone()
    };
    format!(
        "  {} | {:8} {:.2} | {}",
        obs.timestamp, obs.label, obs.score, text
    )
}
