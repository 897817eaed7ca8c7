//! SentimentDb: append-only SQLite storage for observations

use crate::types::{Label, Observation, TIMESTAMP_FORMAT};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("observation text must not be empty")]
    EmptyText,
    #[error("score {0} outside [0, 1]")]
    ScoreOutOfRange(f64),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Append-only store for classified observations.
///
/// Rows are never updated or deleted after insertion; readers take a full
/// snapshot with [`SentimentDb::all`] and aggregate from that. A connection
/// is opened per operation, so a single handle can serve interleaved
/// writers and readers without shared state.
pub struct SentimentDb {
    db_path: PathBuf,
}

impl SentimentDb {
    /// Open (creating if needed) the database at `db_path`.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self { db_path };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<(), StoreError> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS analyses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                text TEXT NOT NULL,
                label TEXT NOT NULL,
                score REAL NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_analyses_timestamp ON analyses(timestamp)",
            [],
        )?;
        Ok(())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Persist one classification result. The timestamp is assigned here,
    /// from the UTC clock, never by the caller.
    pub fn append(&self, text: &str, label: Label, score: f64) -> Result<Observation, StoreError> {
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }
        if !(0.0..=1.0).contains(&score) {
            return Err(StoreError::ScoreOutOfRange(score));
        }

        let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO analyses (timestamp, text, label, score) VALUES (?1, ?2, ?3, ?4)",
            params![&timestamp, text, label.as_str(), score],
        )?;

        Ok(Observation {
            id: conn.last_insert_rowid(),
            timestamp,
            text: text.to_string(),
            label,
            score,
        })
    }

    /// Return every stored observation, oldest first, optionally restricted
    /// to one label. Equal-second inserts keep insertion order via the
    /// rowid tiebreak. Rows whose label column does not parse are skipped
    /// with a warning rather than failing the snapshot.
    pub fn all(&self, filter: Option<Label>) -> Result<Vec<Observation>, StoreError> {
        let conn = Connection::open(&self.db_path)?;

        let mut rows: Vec<(i64, String, String, String, f64)> = Vec::new();
        match filter {
            Some(label) => {
                let mut stmt = conn.prepare(
                    "SELECT id, timestamp, text, label, score FROM analyses
                     WHERE label = ?1 ORDER BY timestamp, id",
                )?;
                let mapped = stmt.query_map(params![label.as_str()], |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                })?;
                for row in mapped {
                    rows.push(row?);
                }
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, timestamp, text, label, score FROM analyses
                     ORDER BY timestamp, id",
                )?;
                let mapped = stmt.query_map([], |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                })?;
                for row in mapped {
                    rows.push(row?);
                }
            }
        }

        let mut observations = Vec::with_capacity(rows.len());
        for (id, timestamp, text, label_str, score) in rows {
            match label_str.parse::<Label>() {
                Ok(label) => observations.push(Observation {
                    id,
                    timestamp,
                    text,
                    label,
                    score,
                }),
                Err(_) => {
                    warn!(row = id, label = %label_str, "skipping row with unknown label");
                }
            }
        }

        Ok(observations)
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = Connection::open(&self.db_path)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
