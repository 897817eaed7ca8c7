//! Text normalization for word-frequency statistics

mod stopwords;
mod tokenizer;

pub use stopwords::STOPWORDS;
pub use tokenizer::Tokenizer;
