mod cli;
mod commands;
mod paths;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db } => commands::init::run(db.as_deref()),
        Commands::Analyze { text, db, neutral } => {
            commands::analyze::run(&text, db.as_deref(), neutral)
        }
        Commands::Stats {
            db,
            neutral,
            top_k,
            stopwords,
        } => commands::stats::run(db.as_deref(), neutral, top_k, stopwords.as_deref()),
        Commands::History { db, label, limit } => {
            commands::history::run(db.as_deref(), label.as_deref(), limit)
        }
    }
}
