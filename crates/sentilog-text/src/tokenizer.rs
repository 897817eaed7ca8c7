//! Tokenizer with stop-word filtering and a permissive fallback mode

use crate::stopwords::STOPWORDS;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

static WORD_RE: OnceLock<Regex> = OnceLock::new();

fn word_re() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"[a-z0-9]+").unwrap())
}

/// Normalizing tokenizer: lower-cases input and splits on non-alphanumeric
/// boundaries. In the default mode, stop-words are dropped; in permissive
/// mode (the fallback when a custom stop-word list cannot be loaded) every
/// word token passes through. Both modes produce counts that are valid for
/// frequency aggregation, just differently filtered.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: Option<HashSet<&'static str>>,
    custom: Option<HashSet<String>>,
}

impl Tokenizer {
    /// Tokenizer with the built-in stop-word list.
    pub fn new() -> Self {
        Self {
            stopwords: Some(STOPWORDS.iter().copied().collect()),
            custom: None,
        }
    }

    /// Tokenizer with no stop-word filtering at all.
    pub fn permissive() -> Self {
        Self {
            stopwords: None,
            custom: None,
        }
    }

    /// Tokenizer backed by a custom stop-word file (one word per line,
    /// `#` comments allowed). An unreadable file degrades to permissive
    /// mode with a warning instead of failing the caller.
    pub fn from_stopword_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let words: HashSet<String> = contents
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.starts_with('#'))
                    .map(str::to_lowercase)
                    .collect();
                Self {
                    stopwords: None,
                    custom: Some(words),
                }
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "stop-word list unavailable, tokenizing without filtering");
                Self::permissive()
            }
        }
    }

    /// Whether stop-word filtering is active.
    pub fn is_filtering(&self) -> bool {
        self.stopwords.is_some() || self.custom.is_some()
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        word_re()
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.is_stopword(token))
            .map(str::to_string)
            .collect()
    }

    fn is_stopword(&self, token: &str) -> bool {
        if let Some(words) = &self.stopwords {
            return words.contains(token);
        }
        if let Some(words) = &self.custom {
            return words.contains(token);
        }
        false
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
