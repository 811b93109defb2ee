//! Command-line / config arguments owned by the encoders.

use clap::Args;
use serde::{Deserialize, Serialize};
use shapepiece_core::{Result, TokenizerError};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Name the sentencepiece encoder is registered under.
pub const SENTENCEPIECE: &str = "sentencepiece";

/// Flags of the sentencepiece encoder.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentencepieceArgs {
    /// Path to sentencepiece model
    #[arg(long = "sentencepiece-model", value_name = "PATH")]
    pub sentencepiece_model: Option<String>,

    /// Encode token shapes [default: false]
    #[arg(
        long = "sentencepiece-encode-shapes",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub sentencepiece_encode_shapes: Option<bool>,
}

impl SentencepieceArgs {
    /// Whether shape encoding is on, `false` when left unset.
    pub fn encode_shapes(&self) -> bool {
        self.sentencepiece_encode_shapes.unwrap_or(false)
    }
}

/// Encoder selection plus the flags of every registered encoder.
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BpeArgs {
    /// Registered name of the encoder to build
    #[arg(long, default_value = SENTENCEPIECE)]
    pub bpe: String,

    #[command(flatten)]
    #[serde(flatten)]
    pub sentencepiece: SentencepieceArgs,
}

impl Default for BpeArgs {
    fn default() -> Self {
        Self {
            bpe: SENTENCEPIECE.to_string(),
            sentencepiece: SentencepieceArgs::default(),
        }
    }
}

impl BpeArgs {
    /// Read arguments from a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| TokenizerError::io(path, e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Fill in whatever was not given on the command line from `config`.
    ///
    /// Explicit flags win; `bpe` is taken from the config only when the
    /// command line left it at the default.
    pub fn merged_with(self, config: BpeArgs) -> Self {
        let bpe = if self.bpe == SENTENCEPIECE {
            config.bpe
        } else {
            self.bpe
        };
        Self {
            bpe,
            sentencepiece: SentencepieceArgs {
                sentencepiece_model: self
                    .sentencepiece
                    .sentencepiece_model
                    .or(config.sentencepiece.sentencepiece_model),
                sentencepiece_encode_shapes: self
                    .sentencepiece
                    .sentencepiece_encode_shapes
                    .or(config.sentencepiece.sentencepiece_encode_shapes),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        bpe: BpeArgs,
    }

    #[test]
    fn test_flags_parse() {
        let cli = TestCli::parse_from([
            "test",
            "--sentencepiece-model",
            "spm.vocab",
            "--sentencepiece-encode-shapes",
        ]);
        assert_eq!(cli.bpe.bpe, SENTENCEPIECE);
        assert_eq!(
            cli.bpe.sentencepiece.sentencepiece_model.as_deref(),
            Some("spm.vocab")
        );
        assert_eq!(cli.bpe.sentencepiece.sentencepiece_encode_shapes, Some(true));
    }

    #[test]
    fn test_encode_shapes_defaults_to_false() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.bpe.sentencepiece.sentencepiece_encode_shapes, None);
        assert!(!cli.bpe.sentencepiece.encode_shapes());
        assert_eq!(cli.bpe.sentencepiece.sentencepiece_model, None);
    }

    #[test]
    fn test_json_config() {
        let args: BpeArgs = serde_json::from_str(
            r#"{"sentencepiece_model": "spm.vocab", "sentencepiece_encode_shapes": true}"#,
        )
        .unwrap();
        assert_eq!(args.bpe, SENTENCEPIECE);
        assert!(args.sentencepiece.encode_shapes());
    }

    #[test]
    fn test_flags_win_over_config() {
        let flags = BpeArgs {
            sentencepiece: SentencepieceArgs {
                sentencepiece_model: Some("flag.vocab".to_string()),
                sentencepiece_encode_shapes: None,
            },
            ..Default::default()
        };
        let config = BpeArgs {
            sentencepiece: SentencepieceArgs {
                sentencepiece_model: Some("config.vocab".to_string()),
                sentencepiece_encode_shapes: Some(true),
            },
            ..Default::default()
        };
        let merged = flags.merged_with(config);
        assert_eq!(
            merged.sentencepiece.sentencepiece_model.as_deref(),
            Some("flag.vocab")
        );
        assert!(merged.sentencepiece.encode_shapes());
    }

    #[test]
    fn test_explicit_false_overrides_config() {
        let cli = TestCli::parse_from(["test", "--sentencepiece-encode-shapes=false"]);
        assert_eq!(cli.bpe.sentencepiece.sentencepiece_encode_shapes, Some(false));

        let config: BpeArgs =
            serde_json::from_str(r#"{"sentencepiece_encode_shapes": true}"#).unwrap();
        let merged = cli.bpe.merged_with(config);
        assert!(!merged.sentencepiece.encode_shapes());
    }
}
