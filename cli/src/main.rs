//! Shapepiece CLI - command-line interface for shape-aware sentencepiece encoding.
//!
//! This is the main entry point for the `shapepiece` command-line tool.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{BuildDictCommand, DecodeCommand, EncodeCommand, TasksCommand};
use shapepiece_tokenizer::BpeArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shapepiece")]
#[command(about = "Sentencepiece encoding with token shapes", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file with encoder arguments; flags given on the command line win
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text, one line in, one line out
    Encode(EncodeCommand),
    /// Decode encoded lines back to text
    Decode(DecodeCommand),
    /// Build a task dictionary from encoded text
    BuildDict(BuildDictCommand),
    /// List registered tasks and encoders
    Tasks(TasksCommand),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = cli
        .config
        .as_deref()
        .map(|path| {
            BpeArgs::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))
        })
        .transpose()?;

    match cli.command {
        Commands::Encode(cmd) => commands::encode::run(cmd, config)?,
        Commands::Decode(cmd) => commands::decode::run(cmd, config)?,
        Commands::BuildDict(cmd) => commands::build_dict::run(cmd)?,
        Commands::Tasks(cmd) => commands::tasks::run(cmd)?,
    }

    Ok(())
}
