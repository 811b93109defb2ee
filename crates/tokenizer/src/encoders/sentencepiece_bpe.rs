//! Sentencepiece encoder with optional token shape encoding.
//!
//! In shape mode the text is segmented lower-cased, and each piece is then
//! re-cut from the original-case text. A piece keeps its original casing when
//! that cased form exists in the vocabulary (after lower-casing) and becomes
//! `<unk>` otherwise.

use super::args::SentencepieceArgs;
use super::Bpe;
use crate::io::PathResolver;
use crate::pre_tokenizer::{lowercase_preserving_len, strip_accents};
use rayon::prelude::*;
use shapepiece_core::{
    load_segmenter, Result, Segmenter, TokenizerError, RESERVED_PIECES, UNK_PIECE, WORD_START,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lower-case segmentation used by the shape transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// Accent-stripped, re-detokenized text in original case
    pub base: String,
    /// Pieces of the lower-cased `base`
    pub pieces: Vec<String>,
    /// Cumulative piece lengths in chars, starting at 0
    pub boundaries: Vec<usize>,
}

impl Segmentation {
    /// `(start, end)` char offsets of each piece.
    pub fn spans(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.boundaries.windows(2).map(|w| (w[0], w[1]))
    }

    /// Whether the pieces cover `" " + base` exactly.
    pub fn is_aligned(&self) -> bool {
        let covered = self.boundaries.last().copied().unwrap_or(0);
        self.pieces.is_empty() || covered == self.base.chars().count() + 1
    }
}

/// Sentencepiece encoder registered as `sentencepiece`.
#[derive(Clone)]
pub struct SentencepieceBpe {
    segmenter: Arc<dyn Segmenter>,
    encode_shapes: bool,
}

impl SentencepieceBpe {
    /// Wrap an already loaded segmenter.
    pub fn new(segmenter: Arc<dyn Segmenter>, encode_shapes: bool) -> Self {
        Self {
            segmenter,
            encode_shapes,
        }
    }

    /// Resolve and load the model named by `--sentencepiece-model`.
    pub fn from_args(args: &SentencepieceArgs, resolver: &dyn PathResolver) -> Result<Self> {
        let model = args.sentencepiece_model.as_deref().ok_or_else(|| {
            TokenizerError::InvalidConfig("--sentencepiece-model is required".to_string())
        })?;
        let path = resolver.resolve(model)?;
        Self::load(&path, args.encode_shapes())
    }

    /// Load the model at a local path.
    pub fn load(path: &Path, encode_shapes: bool) -> Result<Self> {
        let segmenter = load_segmenter(path)?;
        info!(
            model = %path.display(),
            encode_shapes,
            vocab_size = segmenter.vocab_size(),
            "sentencepiece encoder ready"
        );
        Ok(Self::new(segmenter, encode_shapes))
    }

    /// Whether shape encoding is enabled.
    pub fn encode_shapes(&self) -> bool {
        self.encode_shapes
    }

    pub fn segmenter(&self) -> &dyn Segmenter {
        self.segmenter.as_ref()
    }

    /// Encode text into a space-joined piece string.
    pub fn encode(&self, text: &str) -> Result<String> {
        if self.encode_shapes {
            self.encode_with_shapes(text)
        } else {
            Ok(self.segmenter.encode_as_pieces(text)?.join(" "))
        }
    }

    /// Encode many lines in parallel.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        texts.par_iter().map(|text| self.encode(text)).collect()
    }

    /// Undo the piece joining: drop separators and turn `▁` back into spaces.
    pub fn decode(&self, text: &str) -> String {
        text.replace(' ', "")
            .replace(WORD_START, " ")
            .trim()
            .to_string()
    }

    /// Whether `token` starts a word.
    ///
    /// Reserved tokens always count as word starts; they may also be in the
    /// piece vocabulary without the `▁` prefix.
    pub fn is_beginning_of_word(&self, token: &str) -> bool {
        RESERVED_PIECES.contains(&token) || token.starts_with(WORD_START)
    }

    /// Segment the lower-cased, accent-stripped form of `text`.
    pub fn shape_segmentation(&self, text: &str) -> Result<Segmentation> {
        let stripped = strip_accents(text);
        // Round-trip through the segmenter so `base` carries its normalization.
        let base = self
            .segmenter
            .decode_pieces(&self.segmenter.encode_as_pieces(&stripped)?)?;
        let pieces = self
            .segmenter
            .encode_as_pieces(&lowercase_preserving_len(&base))?;

        let mut boundaries = Vec::with_capacity(pieces.len() + 1);
        let mut current = 0;
        boundaries.push(current);
        for piece in &pieces {
            current += piece.chars().count();
            boundaries.push(current);
        }

        Ok(Segmentation {
            base,
            pieces,
            boundaries,
        })
    }

    fn encode_with_shapes(&self, text: &str) -> Result<String> {
        let segmentation = self.shape_segmentation(text)?;
        if !segmentation.is_aligned() {
            warn!(
                text,
                pieces = segmentation.pieces.len(),
                "piece boundaries do not line up with the original text"
            );
        }

        // The leading space stands in for the `▁` the segmenter puts in front
        // of the first word.
        let chars: Vec<char> = std::iter::once(' ')
            .chain(segmentation.base.chars())
            .collect();
        let unk_id = self.segmenter.unk_id();

        let shaped: Vec<String> = segmentation
            .spans()
            .map(|(start, end)| {
                let start = start.min(chars.len());
                let end = end.min(chars.len());
                let candidate: String = chars[start..end]
                    .iter()
                    .map(|&c| if c == ' ' { WORD_START } else { c })
                    .collect();
                let id = self
                    .segmenter
                    .piece_to_id(&lowercase_preserving_len(&candidate));
                if id == unk_id {
                    UNK_PIECE.to_string()
                } else {
                    candidate
                }
            })
            .collect();

        debug!(pieces = shaped.len(), "shape encoded");
        Ok(shaped.join(" "))
    }
}

impl std::fmt::Debug for SentencepieceBpe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentencepieceBpe")
            .field("vocab_size", &self.segmenter.vocab_size())
            .field("encode_shapes", &self.encode_shapes)
            .finish()
    }
}

impl Bpe for SentencepieceBpe {
    fn encode(&self, text: &str) -> Result<String> {
        SentencepieceBpe::encode(self, text)
    }

    fn decode(&self, text: &str) -> String {
        SentencepieceBpe::decode(self, text)
    }

    fn is_beginning_of_word(&self, token: &str) -> bool {
        SentencepieceBpe::is_beginning_of_word(self, token)
    }
}
