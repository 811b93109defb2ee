//! Masked language modeling over a token-shapes dictionary.

use super::{
    build_dictionary_of_kind, dict_path, split_paths, BuildOptions, Task, TaskArgs, MASK_SYMBOL,
};
use crate::dictionary::{Dictionary, DictionaryKind};
use shapepiece_core::{Result, TokenizerError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Masked LM whose input and output share one token-shapes dictionary.
#[derive(Debug, Clone)]
pub struct MaskedLmWithTokenShapesTask {
    dictionary: Dictionary,
}

impl MaskedLmWithTokenShapesTask {
    pub const NAME: &'static str = "masked_lm_with_token_shapes";

    /// Take ownership of `dictionary`, appending the mask symbol.
    pub fn new(mut dictionary: Dictionary) -> Self {
        dictionary.add_symbol(MASK_SYMBOL, 1);
        Self { dictionary }
    }

    /// Load the dictionary from the first data directory.
    pub fn setup_task(args: &TaskArgs) -> Result<Self> {
        let paths = split_paths(&args.data);
        let first = paths.first().ok_or_else(|| {
            TokenizerError::InvalidConfig(format!("{}: no data directory given", Self::NAME))
        })?;

        let task = Self::new(Self::load_dictionary(&dict_path(first))?);
        info!("dictionary: {} types", task.dictionary.len());
        Ok(task)
    }

    pub fn load_dictionary(path: &Path) -> Result<Dictionary> {
        Dictionary::load(path, DictionaryKind::TokenShapes)
    }

    pub fn build_dictionary(files: &[PathBuf], options: &BuildOptions) -> Result<Dictionary> {
        build_dictionary_of_kind(DictionaryKind::TokenShapes, files, options)
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }
}

impl Task for MaskedLmWithTokenShapesTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn source_dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    fn target_dictionary(&self) -> &Dictionary {
        &self.dictionary
    }
}
