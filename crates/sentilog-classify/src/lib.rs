//! Classifier seam: the contract the service depends on, plus a small
//! lexicon-backed default so the binary runs without an external model

mod lexicon;

pub use lexicon::LexiconClassifier;

use sentilog_store::Label;
use serde::{Deserialize, Serialize};

/// One classification result: the label and a confidence in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub label: Label,
    pub score: f64,
}

/// Anything that can label a piece of text. Implementations are injected
/// at startup and passed by reference into the analyze path; the
/// aggregation engine only ever sees already-labeled observations.
pub trait Classifier {
    fn classify(&self, text: &str) -> anyhow::Result<Classification>;
}
