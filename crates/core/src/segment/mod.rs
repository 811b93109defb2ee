//! Subword segmentation engines.
//!
//! A [`Segmenter`] turns text into pieces of a fixed vocabulary and back. The
//! in-process [`UnigramSegmenter`] reads sentencepiece `.vocab` files; binary
//! `.model` files go through the sentencepiece library when the
//! `sentencepiece` feature is enabled.

pub mod unigram;

#[cfg(feature = "sentencepiece")]
pub mod sentencepiece;

pub use unigram::UnigramSegmenter;

#[cfg(feature = "sentencepiece")]
pub use self::sentencepiece::SentencePieceSegmenter;

use crate::error::{Result, TokenizerError};
use std::path::Path;
use std::sync::Arc;

/// Marks the start of a word inside a piece sequence (U+2581).
pub const WORD_START: char = '\u{2581}';

/// Same as [`WORD_START`], as a string.
pub const WORD_START_STR: &str = "\u{2581}";

/// A segmented unit: surface string plus vocabulary id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Surface string, with `▁` marking a word start
    pub surface: String,
    /// Vocabulary id (the unknown id for uncovered text)
    pub id: u32,
}

impl Piece {
    pub fn new(surface: impl Into<String>, id: u32) -> Self {
        Self {
            surface: surface.into(),
            id,
        }
    }

    /// Length of the surface in chars.
    #[inline]
    pub fn char_len(&self) -> usize {
        self.surface.chars().count()
    }
}

/// A loaded segmentation model.
///
/// Implementations are immutable after loading and may be shared between
/// threads.
pub trait Segmenter: Send + Sync {
    /// Segment text into pieces.
    fn encode(&self, text: &str) -> Result<Vec<Piece>>;

    /// Turn pieces back into text.
    fn decode_pieces(&self, pieces: &[String]) -> Result<String>;

    /// Vocabulary id of a piece, [`Segmenter::unk_id`] when unknown.
    fn piece_to_id(&self, piece: &str) -> u32;

    /// Id returned for out-of-vocabulary lookups.
    fn unk_id(&self) -> u32;

    /// Number of pieces in the vocabulary.
    fn vocab_size(&self) -> usize;

    /// Segment text and keep only the piece surfaces.
    fn encode_as_pieces(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .encode(text)?
            .into_iter()
            .map(|piece| piece.surface)
            .collect())
    }
}

/// Load the segmenter matching the model file at `path`.
///
/// `.model` files need the sentencepiece library; everything else is read as
/// a `.vocab` file by the [`UnigramSegmenter`].
pub fn load_segmenter(path: &Path) -> Result<Arc<dyn Segmenter>> {
    let is_binary_model = path.extension().is_some_and(|ext| ext == "model");

    if is_binary_model {
        return load_binary_model(path);
    }

    Ok(Arc::new(UnigramSegmenter::load(path)?))
}

#[cfg(feature = "sentencepiece")]
fn load_binary_model(path: &Path) -> Result<Arc<dyn Segmenter>> {
    Ok(Arc::new(SentencePieceSegmenter::load(path)?))
}

#[cfg(not(feature = "sentencepiece"))]
fn load_binary_model(path: &Path) -> Result<Arc<dyn Segmenter>> {
    Err(TokenizerError::EngineUnavailable(format!(
        "{} is a binary sentencepiece model; rebuild with `--features sentencepiece` \
         or pass the matching .vocab file instead",
        path.display()
    )))
}
