//! Observation record types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Storage format for observation timestamps (UTC, second precision).
///
/// Matches SQLite's `CURRENT_TIMESTAMP` shape, so rows written by other
/// tooling against the same table stay readable. Zero-padded fields keep
/// lexicographic order chronological.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sentiment category assigned by the classifier.
///
/// The set is closed and ordered; the wire form is the upper-case name
/// (`"POSITIVE"`), matching what classifier pipelines emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Positive,
    Negative,
    Neutral,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "POSITIVE",
            Label::Negative => "NEGATIVE",
            Label::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sentiment label: {0}")]
pub struct ParseLabelError(pub String);

impl FromStr for Label {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POSITIVE" => Ok(Label::Positive),
            "NEGATIVE" => Ok(Label::Negative),
            "NEUTRAL" => Ok(Label::Neutral),
            other => Err(ParseLabelError(other.to_string())),
        }
    }
}

/// One persisted classification result.
///
/// `timestamp` stays textual so that a row with corrupt timestamp data can
/// still participate in the non-temporal statistics; callers that need time
/// semantics parse it per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub id: i64,
    pub timestamp: String,
    pub text: String,
    pub label: Label,
    pub score: f64,
}
