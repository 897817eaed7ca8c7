use crate::paths::resolve_db;
use sentilog_classify::{Classifier, LexiconClassifier};
use sentilog_store::{Observation, SentimentDb};
use std::path::Path;

pub fn run(text: &str, db: Option<&Path>, neutral: bool) -> anyhow::Result<()> {
    let classifier = if neutral {
        LexiconClassifier::with_neutral()
    } else {
        LexiconClassifier::new()
    };
    let db_path = resolve_db(db)?;
    let store = SentimentDb::open(&db_path)?;

    let observation = classify_and_store(&classifier, &store, text)?;
    println!("{}", serde_json::to_string_pretty(&observation)?);
    Ok(())
}

/// Classify one text and persist the result. The classifier is an injected
/// collaborator; a failure from it propagates, nothing gets stored.
fn classify_and_store(
    classifier: &dyn Classifier,
    store: &SentimentDb,
    text: &str,
) -> anyhow::Result<Observation> {
    let result = classifier.classify(text)?;
    let observation = store.append(text, result.label, result.score)?;
    Ok(observation)
}
