//! Encode command implementation.

use clap::Parser;

/// Encode command arguments.
#[derive(Parser)]
pub struct EncodeCommand {
    #[command(flatten)]
    pub bpe: BpeArgs,

    /// Text to encode ("-" reads stdin)
    #[arg(short, long, conflicts_with = "input_file")]
    pub input: Option<String>,

    /// File with one text per line
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

use super::{build_encoder, read_lines, write_lines};
use anyhow::{Context, Result as AnyhowResult};
use shapepiece_tokenizer::BpeArgs;
use std::path::PathBuf;
use tracing::info;

pub fn run(cmd: EncodeCommand, config: Option<BpeArgs>) -> AnyhowResult<()> {
    let encoder = build_encoder(cmd.bpe, config)?;

    let lines = read_lines(cmd.input, cmd.input_file.as_deref())?;
    let encoded = lines
        .iter()
        .map(|line| encoder.encode(line))
        .collect::<Result<Vec<_>, _>>()
        .context("encoding failed")?;

    write_lines(&encoded, cmd.output.as_deref())?;
    info!(lines = encoded.len(), "encoded");
    Ok(())
}
