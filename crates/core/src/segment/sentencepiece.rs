//! Binary sentencepiece `.model` support through the sentencepiece library.

use super::{Piece, Segmenter};
use crate::error::{Result, TokenizerError};
use sentencepiece::SentencePieceProcessor;
use std::path::Path;
use tracing::info;

/// Segmenter backed by a loaded `SentencePieceProcessor`.
pub struct SentencePieceSegmenter {
    inner: SentencePieceProcessor,
}

impl SentencePieceSegmenter {
    /// Load a binary `.model` file.
    pub fn load(path: &Path) -> Result<Self> {
        let inner = SentencePieceProcessor::open(path).map_err(|e| {
            TokenizerError::Load(format!(
                "Failed to load sentencepiece model {}: {}",
                path.display(),
                e
            ))
        })?;
        info!(
            path = %path.display(),
            pieces = inner.len(),
            "loaded sentencepiece model"
        );
        Ok(Self { inner })
    }
}

impl Segmenter for SentencePieceSegmenter {
    fn encode(&self, text: &str) -> Result<Vec<Piece>> {
        let pieces = self
            .inner
            .encode(text)
            .map_err(|e| TokenizerError::Tokenization(e.to_string()))?;
        Ok(pieces
            .into_iter()
            .map(|p| Piece::new(p.piece, p.id))
            .collect())
    }

    fn decode_pieces(&self, pieces: &[String]) -> Result<String> {
        self.inner
            .decode_pieces(pieces)
            .map_err(|e| TokenizerError::Tokenization(e.to_string()))
    }

    fn piece_to_id(&self, piece: &str) -> u32 {
        // The library reports unknown pieces as `None`.
        match self.inner.piece_to_id(piece) {
            Ok(Some(id)) => id,
            _ => self.inner.unk_id(),
        }
    }

    fn unk_id(&self) -> u32 {
        self.inner.unk_id()
    }

    fn vocab_size(&self) -> usize {
        self.inner.len()
    }
}
