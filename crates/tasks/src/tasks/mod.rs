//! Task plugins and the registry they are set up from.
//!
//! A task owns the dictionaries a training pipeline reads its data with.
//! Which dictionary flavour a task uses is a [`DictionaryKind`] chosen by the
//! task, not a dictionary subtype.

pub mod masked_lm;
pub mod sentence_prediction;

pub use masked_lm::MaskedLmWithTokenShapesTask;
pub use sentence_prediction::SentencePredictionWithTokenShapesTask;

use crate::dictionary::{Dictionary, DictionaryKind, FinalizeOptions};
use crate::tokenize::tokenize_line;
use shapepiece_core::{Registry, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Symbol appended to every task dictionary for masking.
pub const MASK_SYMBOL: &str = "<mask>";

/// Arguments tasks are set up from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskArgs {
    /// Data directories, separated by `:`
    pub data: String,
    /// Labels are real values; no label dictionary is loaded
    pub regression_target: bool,
}

impl TaskArgs {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            regression_target: false,
        }
    }
}

/// Options for building a dictionary from raw text files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Parallel chunks per file
    pub workers: usize,
    pub finalize: FinalizeOptions,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            finalize: FinalizeOptions::default(),
        }
    }
}

/// A set-up task.
pub trait Task: Send + Sync {
    /// Registered name.
    fn name(&self) -> &'static str;

    /// Dictionary of the input side.
    fn source_dictionary(&self) -> &Dictionary;

    /// Dictionary of the output side.
    fn target_dictionary(&self) -> &Dictionary;
}

/// How to set up a task and build its dictionary.
#[derive(Clone, Copy)]
pub struct TaskEntry {
    pub setup: fn(&TaskArgs) -> Result<Box<dyn Task>>,
    pub build_dictionary: fn(&[PathBuf], &BuildOptions) -> Result<Dictionary>,
}

/// Registry of tasks by name.
#[derive(Clone)]
pub struct TaskRegistry {
    inner: Registry<TaskEntry>,
}

impl TaskRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            inner: Registry::new("task"),
        }
    }

    /// A registry holding every task this crate provides.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(
                MaskedLmWithTokenShapesTask::NAME,
                TaskEntry {
                    setup: setup_masked_lm,
                    build_dictionary: MaskedLmWithTokenShapesTask::build_dictionary,
                },
            )
            .expect("builtin task names are unique");
        registry
            .register(
                SentencePredictionWithTokenShapesTask::NAME,
                TaskEntry {
                    setup: setup_sentence_prediction,
                    build_dictionary: SentencePredictionWithTokenShapesTask::build_dictionary,
                },
            )
            .expect("builtin task names are unique");
        registry
    }

    pub fn register(&mut self, name: &str, entry: TaskEntry) -> Result<()> {
        self.inner.register(name, entry)
    }

    /// Set up the task registered as `name`.
    pub fn setup_task(&self, name: &str, args: &TaskArgs) -> Result<Box<dyn Task>> {
        let entry = self.inner.get(name)?;
        (entry.setup)(args)
    }

    /// Build a dictionary the way the task registered as `name` does.
    pub fn build_dictionary(
        &self,
        name: &str,
        files: &[PathBuf],
        options: &BuildOptions,
    ) -> Result<Dictionary> {
        let entry = self.inner.get(name)?;
        (entry.build_dictionary)(files, options)
    }

    pub fn names(&self) -> Vec<String> {
        self.inner.names()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

fn setup_masked_lm(args: &TaskArgs) -> Result<Box<dyn Task>> {
    Ok(Box::new(MaskedLmWithTokenShapesTask::setup_task(args)?))
}

fn setup_sentence_prediction(args: &TaskArgs) -> Result<Box<dyn Task>> {
    Ok(Box::new(SentencePredictionWithTokenShapesTask::setup_task(
        args,
    )?))
}

/// Split a `:`-separated list of data paths, dropping empty entries.
pub fn split_paths(data: &str) -> Vec<PathBuf> {
    data.split(':')
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Count `files` into a fresh dictionary of `kind` and finalize it.
pub(crate) fn build_dictionary_of_kind(
    kind: DictionaryKind,
    files: &[PathBuf],
    options: &BuildOptions,
) -> Result<Dictionary> {
    let mut dict = Dictionary::new(kind);
    for file in files {
        Dictionary::add_file_to_dictionary(file, &mut dict, tokenize_line, options.workers)?;
    }
    dict.finalize(options.finalize);
    info!(files = files.len(), types = dict.len(), "built dictionary");
    Ok(dict)
}

/// Path of the `dict.txt` inside `dir`.
pub(crate) fn dict_path(dir: &Path) -> PathBuf {
    dir.join("dict.txt")
}
