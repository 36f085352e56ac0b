//! Stoa CLI: the main entry point.
//!
//! Commands:
//! - `select`: Pick one passage for the given readings
//! - `classify`: Show the context derived from the readings
//! - `providers`: List supported model vendors
//! - `doctor`: Diagnose configuration, corpus and retrieval
//! - `corpus`: Summarize the active corpus
//! - `onboard`: Write a starter config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::SignalArgs;

#[derive(Parser)]
#[command(
    name = "stoa",
    about = "Stoa — context-aware Stoic wisdom, one passage at a time",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.stoa/config.toml
    #[arg(short, long, global = true, env = "STOA_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Select one passage for the current context
    Select {
        #[command(flatten)]
        signals: SignalArgs,

        /// Skip retrieval and provider tiers
        #[arg(long)]
        local_only: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the context derived from the readings
    Classify {
        #[command(flatten)]
        signals: SignalArgs,
    },

    /// List supported model vendors
    Providers,

    /// Diagnose configuration, corpus and retrieval health
    Doctor,

    /// Summarize the active corpus
    Corpus {
        /// List every item id
        #[arg(long)]
        list: bool,
    },

    /// Write a starter configuration file
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output stays parseable.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Select {
            signals,
            local_only,
            json,
        } => commands::select::run(config_path, &signals, local_only, json).await?,
        Commands::Classify { signals } => commands::classify::run(&signals).await?,
        Commands::Providers => commands::providers::run(config_path).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::Corpus { list } => commands::corpus::run(config_path, list).await?,
        Commands::Onboard => commands::onboard::run(config_path).await?,
    }

    Ok(())
}
