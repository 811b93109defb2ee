//! CLI commands for shapepiece.

pub mod build_dict;
pub mod decode;
pub mod encode;
pub mod tasks;

pub use build_dict::BuildDictCommand;
pub use decode::DecodeCommand;
pub use encode::EncodeCommand;
pub use tasks::TasksCommand;

use anyhow::{Context, Result as AnyhowResult};
use shapepiece_tokenizer::{Bpe, BpeArgs, BpeRegistry, CachedPathResolver};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Build the encoder named by `args`, filling gaps from the config file.
pub fn build_encoder(args: BpeArgs, config: Option<BpeArgs>) -> AnyhowResult<Arc<dyn Bpe>> {
    let args = match config {
        Some(config) => args.merged_with(config),
        None => args,
    };
    debug!(?args, "building encoder");

    let resolver = CachedPathResolver::from_env();
    BpeRegistry::with_builtin()
        .build(&args, &resolver)
        .with_context(|| format!("failed to build encoder '{}'", args.bpe))
}

/// Input lines from `--input` ("-" is stdin) or `--input-file`.
pub fn read_lines(input: Option<String>, input_file: Option<&Path>) -> AnyhowResult<Vec<String>> {
    let text = match (input, input_file) {
        (_, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (Some(input), None) if input == "-" => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        (Some(input), None) => input,
        (None, None) => anyhow::bail!("one of --input or --input-file is required"),
    };
    Ok(text.lines().map(str::to_string).collect())
}

/// Write one line per entry to `output`, or stdout.
pub fn write_lines(lines: &[String], output: Option<&Path>) -> AnyhowResult<()> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}
