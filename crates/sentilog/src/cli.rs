use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sentilog")]
#[command(version)]
#[command(about = "Sentiment logging and statistics over an append-only observation store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the observation database
    Init {
        /// Database path (defaults to ~/.sentilog/sentiment.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Classify a text and persist the observation
    Analyze {
        /// The text to classify
        text: String,

        /// Database path (defaults to ~/.sentilog/sentiment.db)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Allow a NEUTRAL verdict instead of forcing a binary one
        #[arg(long)]
        neutral: bool,
    },

    /// Recompute all statistics from the full history and print them as JSON
    Stats {
        /// Database path (defaults to ~/.sentilog/sentiment.db)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Include the NEUTRAL label in every projection
        #[arg(long)]
        neutral: bool,

        /// Word-frequency table size per label
        #[arg(long)]
        top_k: Option<usize>,

        /// Custom stop-word list (one word per line)
        #[arg(long)]
        stopwords: Option<PathBuf>,
    },

    /// Show recent observations, newest first
    History {
        /// Database path (defaults to ~/.sentilog/sentiment.db)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Restrict to one label (POSITIVE, NEGATIVE or NEUTRAL)
        #[arg(long)]
        label: Option<String>,

        /// Number of observations to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}
