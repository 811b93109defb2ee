//! Dictionary building command implementation.

use clap::Parser;

/// Build-dict command arguments.
#[derive(Parser)]
pub struct BuildDictCommand {
    /// Task whose dictionary flavour to build
    #[arg(short, long)]
    pub task: String,

    /// Encoded training files, one sentence per line
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output dictionary file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Parallel chunks per file
    #[arg(short, long, default_value_t = 1)]
    pub workers: usize,

    /// Drop symbols seen fewer times than this
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub threshold: i64,

    /// Keep at most this many symbols
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub nwords: i64,

    /// Pad the dictionary size to a multiple of this
    #[arg(long, default_value_t = 8)]
    pub padding_factor: usize,
}

use anyhow::{Context, Result as AnyhowResult};
use shapepiece_tasks::{BuildOptions, FinalizeOptions, TaskRegistry};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

pub fn run(cmd: BuildDictCommand) -> AnyhowResult<()> {
    let options = BuildOptions {
        workers: cmd.workers,
        finalize: FinalizeOptions {
            threshold: cmd.threshold,
            nwords: cmd.nwords,
            padding_factor: cmd.padding_factor,
        },
    };

    let start = Instant::now();
    let dictionary = TaskRegistry::with_builtin()
        .build_dictionary(&cmd.task, &cmd.files, &options)
        .with_context(|| format!("building dictionary for task '{}'", cmd.task))?;

    dictionary
        .save(&cmd.output)
        .with_context(|| format!("writing {}", cmd.output.display()))?;

    info!(
        types = dictionary.len(),
        output = %cmd.output.display(),
        seconds = start.elapsed().as_secs_f64(),
        "dictionary saved"
    );
    Ok(())
}
