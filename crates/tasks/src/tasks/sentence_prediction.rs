//! Sentence-level classification and regression over token-shaped input.

use super::{
    build_dictionary_of_kind, dict_path, split_paths, BuildOptions, Task, TaskArgs, MASK_SYMBOL,
};
use crate::dictionary::{Dictionary, DictionaryKind};
use shapepiece_core::{Result, TokenizerError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Sentence prediction whose input dictionary carries token shapes.
///
/// Data directories are laid out as `input0/dict.txt` for the input side and
/// `label/dict.txt` for the labels. Regression targets need no label
/// dictionary; the input dictionary stands in for it.
#[derive(Debug, Clone)]
pub struct SentencePredictionWithTokenShapesTask {
    source: Dictionary,
    target: Dictionary,
}

impl SentencePredictionWithTokenShapesTask {
    pub const NAME: &'static str = "sentence_prediction_with_token_shapes";

    pub fn new(source: Dictionary, target: Dictionary) -> Self {
        Self { source, target }
    }

    pub fn setup_task(args: &TaskArgs) -> Result<Self> {
        let paths = split_paths(&args.data);
        let data = paths.first().ok_or_else(|| {
            TokenizerError::InvalidConfig(format!("{}: no data directory given", Self::NAME))
        })?;

        let source = Self::load_dictionary(&dict_path(&data.join("input0")), true)?;
        info!("[input] dictionary: {} types", source.len());

        let target = if args.regression_target {
            source.clone()
        } else {
            let target = Self::load_dictionary(&dict_path(&data.join("label")), false)?;
            info!("[label] dictionary: {} types", target.len());
            target
        };

        Ok(Self::new(source, target))
    }

    /// Load a dictionary and append the mask symbol.
    ///
    /// Only the input side (`source`) reserves token-shape slots.
    pub fn load_dictionary(path: &Path, source: bool) -> Result<Dictionary> {
        let kind = if source {
            DictionaryKind::TokenShapes
        } else {
            DictionaryKind::Plain
        };
        let mut dictionary = Dictionary::load(path, kind)?;
        dictionary.add_symbol(MASK_SYMBOL, 1);
        Ok(dictionary)
    }

    pub fn build_dictionary(files: &[PathBuf], options: &BuildOptions) -> Result<Dictionary> {
        build_dictionary_of_kind(DictionaryKind::Plain, files, options)
    }
}

impl Task for SentencePredictionWithTokenShapesTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn source_dictionary(&self) -> &Dictionary {
        &self.source
    }

    fn target_dictionary(&self) -> &Dictionary {
        &self.target
    }
}
