//! Decode command implementation.

use clap::Parser;

/// Decode command arguments.
#[derive(Parser)]
pub struct DecodeCommand {
    #[command(flatten)]
    pub bpe: BpeArgs,

    /// Encoded text to decode ("-" reads stdin)
    #[arg(short, long, conflicts_with = "input_file")]
    pub input: Option<String>,

    /// File with one encoded text per line
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

use super::{build_encoder, read_lines, write_lines};
use anyhow::Result as AnyhowResult;
use shapepiece_tokenizer::BpeArgs;
use std::path::PathBuf;

pub fn run(cmd: DecodeCommand, config: Option<BpeArgs>) -> AnyhowResult<()> {
    let encoder = build_encoder(cmd.bpe, config)?;

    let decoded: Vec<String> = read_lines(cmd.input, cmd.input_file.as_deref())?
        .iter()
        .map(|line| encoder.decode(line))
        .collect();

    write_lines(&decoded, cmd.output.as_deref())
}
