//! Error types for the shapepiece libraries.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the shapepiece libraries.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Error reported by a segmentation engine while encoding or decoding
    #[error("Tokenization error: {0}")]
    Tokenization(String),

    /// Error loading a segmentation model or vocabulary
    #[error("Load error: {0}")]
    Load(String),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A model path or identifier could not be resolved to a local file
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The segmentation engine needed for a model is not available
    #[error("Segmentation engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Malformed dictionary data
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// Lookup of a name that was never registered
    #[error("Unknown {kind} '{name}' (known: {})", known.join(", "))]
    UnknownRegistryEntry {
        kind: &'static str,
        name: String,
        known: Vec<String>,
    },

    /// The same name registered twice
    #[error("{kind} '{name}' is already registered")]
    DuplicateRegistryEntry { kind: &'static str, name: String },
}

impl TokenizerError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            err,
        }
    }
}

/// Result type alias for shapepiece operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
