//! Shapepiece-tokenizer - sentencepiece encoding with token shapes
//!
//! This crate wraps a subword segmenter into the line encoder a training
//! pipeline calls: text in, space-separated pieces out. With shape encoding
//! enabled, pieces are chosen on the lower-cased text but emitted in their
//! original casing.
//!
//! # Features
//!
//! - `SentencepieceBpe` with plain and shape encoding modes
//! - Accent stripping and length-preserving lower-casing
//! - Cache-aware resolution of model paths
//! - Encoder registry driven by `--bpe` / `--sentencepiece-*` flags
//!
//! # Example
//!
//! ```rust
//! use shapepiece_core::{PieceVocab, UnigramSegmenter};
//! use shapepiece_tokenizer::SentencepieceBpe;
//! use std::sync::Arc;
//!
//! let vocab = PieceVocab::parse("<unk>\t0\n▁hello\t-1\n▁world\t-1\n")?;
//! let bpe = SentencepieceBpe::new(Arc::new(UnigramSegmenter::new(vocab)), true);
//!
//! let encoded = bpe.encode("Hello World")?;
//! assert_eq!(encoded, "▁Hello ▁World");
//! assert_eq!(bpe.decode(&encoded), "Hello World");
//! # Ok::<(), shapepiece_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use shapepiece_core::{Result, TokenizerError, WORD_START};

// Encoders
pub mod encoders;
pub use encoders::{
    Bpe, BpeArgs, BpeFactory, BpeRegistry, Segmentation, SentencepieceArgs, SentencepieceBpe,
};

// Model path resolution
pub mod io;
pub use io::{CachedPathResolver, PathResolver};

// Pre-tokenization
pub mod pre_tokenizer;
pub use pre_tokenizer::{lowercase_preserving_len, strip_accents};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
