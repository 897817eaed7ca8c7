//! Observation data model and the append-only SQLite record store

mod db;
mod types;

pub use db::{SentimentDb, StoreError};
pub use types::{Label, Observation, ParseLabelError, TIMESTAMP_FORMAT};
