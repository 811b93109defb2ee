//! Shapepiece-core - piece vocabularies and segmentation engines
//!
//! This crate provides the pieces every other shapepiece crate builds on:
//! the error type, the piece vocabulary, the [`Segmenter`] contract for
//! subword segmentation engines and the name registries plugins are
//! looked up in.
//!
//! # Features
//!
//! - In-process unigram segmentation of sentencepiece `.vocab` files
//! - Binary `.model` support behind the `sentencepiece` cargo feature
//! - Explicit name -> factory registries
//!
//! # Example
//!
//! ```rust
//! use shapepiece_core::{PieceVocab, Segmenter, UnigramSegmenter};
//!
//! let vocab = PieceVocab::parse("<unk>\t0\n▁hello\t-1\n▁world\t-1\n")?;
//! let segmenter = UnigramSegmenter::new(vocab);
//! assert_eq!(segmenter.encode_as_pieces("hello world")?, ["▁hello", "▁world"]);
//! # Ok::<(), shapepiece_core::TokenizerError>(())
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

pub mod core;
pub use self::core::{
    is_reserved, PieceVocab, Registry, BOS_PIECE, EOS_PIECE, PAD_PIECE, RESERVED_PIECES,
    UNK_PIECE,
};

// Segmentation engines
pub mod segment;
pub use segment::{load_segmenter, Piece, Segmenter, UnigramSegmenter, WORD_START, WORD_START_STR};

#[cfg(feature = "sentencepiece")]
pub use segment::SentencePieceSegmenter;
