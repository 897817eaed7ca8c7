//! Lexicon-backed classifier

use crate::{Classification, Classifier};
use sentilog_store::Label;
use sentilog_text::Tokenizer;

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "beautiful", "best", "brilliant", "delightful", "enjoy", "enjoyed",
    "excellent", "fantastic", "favorite", "glad", "good", "great", "happy", "helpful",
    "impressive", "love", "loved", "nice", "outstanding", "perfect", "pleasant", "pleased",
    "quality", "recommend", "reliable", "satisfied", "smooth", "solid", "superb", "useful",
    "wonderful", "works",
];

const NEGATIVE_WORDS: &[&str] = &[
    "angry", "annoying", "awful", "bad", "broke", "broken", "buggy", "cheap", "crash", "crashed",
    "defective", "disappointed", "disappointing", "dislike", "fail", "failed", "faulty", "hate",
    "hated", "horrible", "late", "mediocre", "poor", "refund", "return", "sad", "slow", "terrible",
    "unusable", "useless", "waste", "worst", "worthless", "wrong",
];

/// Classifies by counting hits against small embedded word lists. The
/// confidence is derived from the hit margin and clamped to [0.5, 1.0],
/// mirroring the score range a binary model emits for its winning label.
///
/// A stand-in for a real model behind the [`Classifier`] seam; accuracy is
/// not the point, producing well-formed observations is.
pub struct LexiconClassifier {
    tokenizer: Tokenizer,
    neutral: bool,
}

impl LexiconClassifier {
    /// Binary classifier: every input maps to positive or negative.
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::permissive(),
            neutral: false,
        }
    }

    /// Variant that returns neutral when the lexicons give no signal.
    pub fn with_neutral() -> Self {
        Self {
            neutral: true,
            ..Self::new()
        }
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for LexiconClassifier {
    fn classify(&self, text: &str) -> anyhow::Result<Classification> {
        let tokens = self.tokenizer.tokenize(text);
        let positive = tokens
            .iter()
            .filter(|t| POSITIVE_WORDS.contains(&t.as_str()))
            .count() as f64;
        let negative = tokens
            .iter()
            .filter(|t| NEGATIVE_WORDS.contains(&t.as_str()))
            .count() as f64;
        let total = positive + negative;

        if self.neutral && (total == 0.0 || positive == negative) {
            return Ok(Classification {
                label: Label::Neutral,
                score: 0.5,
            });
        }

        let label = if positive >= negative {
            Label::Positive
        } else {
            Label::Negative
        };
        let score = if total == 0.0 {
            0.5
        } else {
            (0.5 + 0.5 * (positive - negative).abs() / total).clamp(0.5, 1.0)
        };

        Ok(Classification { label, score })
    }
}
