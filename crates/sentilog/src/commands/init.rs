use crate::paths::resolve_db;
use sentilog_store::SentimentDb;
use std::path::Path;

pub fn run(db: Option<&Path>) -> anyhow::Result<()> {
    let db_path = resolve_db(db)?;
    let store = SentimentDb::open(&db_path)?;
    println!(
        "Database ready at {} ({} observations)",
        store.path().display(),
        store.count()?
    );
    Ok(())
}
