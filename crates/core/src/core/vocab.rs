//! Piece vocabulary storage and lookup.
//!
//! Pieces are stored densely by id with an `AHashMap` for the reverse lookup
//! and `CompactString` for the (mostly short) piece strings.

use crate::error::{Result, TokenizerError};
use ahash::AHashMap;
use compact_str::CompactString;
use std::fs;
use std::path::Path;

/// Surface form of the unknown piece.
pub const UNK_PIECE: &str = "<unk>";
/// Surface form of the begin-of-sequence piece.
pub const BOS_PIECE: &str = "<s>";
/// Surface form of the end-of-sequence piece.
pub const EOS_PIECE: &str = "</s>";
/// Surface form of the padding piece.
pub const PAD_PIECE: &str = "<pad>";

/// Reserved pieces. They may sit in the vocabulary but never match text.
pub const RESERVED_PIECES: [&str; 4] = [UNK_PIECE, BOS_PIECE, EOS_PIECE, PAD_PIECE];

/// Forward mapping: piece string -> ID
pub type PieceIds = AHashMap<CompactString, u32>;

/// Vocabulary of a unigram segmentation model.
#[derive(Debug, Clone)]
pub struct PieceVocab {
    /// Forward mapping: piece string -> ID
    ids: PieceIds,
    /// Pieces indexed by ID
    pieces: Vec<CompactString>,
    /// Log-probability score per ID
    scores: Vec<f32>,
    /// ID of `<unk>`
    unk_id: u32,
    /// Longest matchable piece, in chars
    max_piece_chars: usize,
    /// Lowest score among matchable pieces
    min_score: f32,
}

impl PieceVocab {
    /// Build a vocabulary from `(piece, score)` entries, ids assigned in order.
    ///
    /// Fails if the entries contain duplicates or no `<unk>` piece.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f32)>,
        S: AsRef<str>,
    {
        let entries = entries.into_iter();
        let (lower, _) = entries.size_hint();
        let mut ids = PieceIds::with_capacity(lower);
        let mut pieces = Vec::with_capacity(lower);
        let mut scores = Vec::with_capacity(lower);
        let mut max_piece_chars = 0;
        let mut min_score = f32::MAX;

        for (piece, score) in entries {
            let piece = CompactString::new(piece.as_ref());
            let id = pieces.len() as u32;
            if ids.insert(piece.clone(), id).is_some() {
                return Err(TokenizerError::Load(format!(
                    "Duplicate piece '{}' in vocabulary",
                    piece
                )));
            }
            if !is_reserved(&piece) {
                max_piece_chars = max_piece_chars.max(piece.chars().count());
                min_score = min_score.min(score);
            }
            pieces.push(piece);
            scores.push(score);
        }

        let unk_id = ids.get(UNK_PIECE).copied().ok_or_else(|| {
            TokenizerError::Load(format!("Vocabulary has no {} piece", UNK_PIECE))
        })?;

        if min_score == f32::MAX {
            min_score = 0.0;
        }

        Ok(Self {
            ids,
            pieces,
            scores,
            unk_id,
            max_piece_chars,
            min_score,
        })
    }

    /// Load a sentencepiece `.vocab` file: one `piece<TAB>score` per line.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TokenizerError::io(path, e))?;
        Self::parse(&content)
    }

    /// Parse the contents of a `.vocab` file.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (piece, score) = line.split_once('\t').ok_or_else(|| {
                TokenizerError::Load(format!(
                    "Invalid vocab format at line {}: '{}'",
                    line_num + 1,
                    line
                ))
            })?;
            let score: f32 = score.trim().parse().map_err(|_| {
                TokenizerError::Load(format!(
                    "Invalid score at line {}: '{}'",
                    line_num + 1,
                    score
                ))
            })?;
            entries.push((piece, score));
        }
        Self::from_entries(entries)
    }

    /// Get the ID for a piece string.
    #[inline]
    pub fn get_id(&self, piece: &str) -> Option<u32> {
        self.ids.get(piece).copied()
    }

    /// Get the ID for a piece string, falling back to the unknown id.
    #[inline]
    pub fn piece_to_id(&self, piece: &str) -> u32 {
        self.get_id(piece).unwrap_or(self.unk_id)
    }

    /// Get the piece string for an ID.
    #[inline]
    pub fn get_piece(&self, id: u32) -> Option<&str> {
        self.pieces.get(id as usize).map(|s| s.as_str())
    }

    /// Score of a piece, if present.
    #[inline]
    pub fn score(&self, id: u32) -> Option<f32> {
        self.scores.get(id as usize).copied()
    }

    /// ID of the piece that may be matched against text.
    ///
    /// Reserved pieces are never returned.
    #[inline]
    pub fn matchable_id(&self, piece: &str) -> Option<u32> {
        if is_reserved(piece) {
            return None;
        }
        self.get_id(piece)
    }

    /// ID of `<unk>`.
    #[inline]
    pub fn unk_id(&self) -> u32 {
        self.unk_id
    }

    /// Longest matchable piece, in chars.
    #[inline]
    pub fn max_piece_chars(&self) -> usize {
        self.max_piece_chars
    }

    /// Lowest score among matchable pieces.
    #[inline]
    pub fn min_score(&self) -> f32 {
        self.min_score
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Check if the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

/// Whether a piece is a control piece: one of [`RESERVED_PIECES`] or a
/// `<0xNN>` byte-fallback piece.
pub fn is_reserved(piece: &str) -> bool {
    RESERVED_PIECES.contains(&piece) || is_byte_piece(piece)
}

fn is_byte_piece(piece: &str) -> bool {
    piece.len() == 6
        && piece.starts_with("<0x")
        && piece.ends_with('>')
        && piece[3..5].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PieceVocab {
        PieceVocab::parse("<unk>\t0\n<s>\t0\n</s>\t0\n▁hello\t-1.5\nwor\t-3\n<0x41>\t0\n").unwrap()
    }

    #[test]
    fn test_parse_assigns_ids_in_order() {
        let vocab = sample();
        assert_eq!(vocab.len(), 6);
        assert_eq!(vocab.unk_id(), 0);
        assert_eq!(vocab.get_id("▁hello"), Some(3));
        assert_eq!(vocab.get_piece(4), Some("wor"));
        assert_eq!(vocab.score(3), Some(-1.5));
    }

    #[test]
    fn test_piece_to_id_falls_back_to_unk() {
        let vocab = sample();
        assert_eq!(vocab.piece_to_id("▁hello"), 3);
        assert_eq!(vocab.piece_to_id("missing"), vocab.unk_id());
    }

    #[test]
    fn test_reserved_pieces_are_not_matchable() {
        let vocab = sample();
        assert_eq!(vocab.matchable_id("<s>"), None);
        assert_eq!(vocab.matchable_id("<0x41>"), None);
        assert_eq!(vocab.matchable_id("wor"), Some(4));
        assert_eq!(vocab.max_piece_chars(), 6);
        assert_eq!(vocab.min_score(), -3.0);
    }

    #[test]
    fn test_missing_unk_is_an_error() {
        let err = PieceVocab::parse("▁a\t-1\n").unwrap_err();
        assert!(matches!(err, TokenizerError::Load(_)));
    }

    #[test]
    fn test_duplicate_piece_is_an_error() {
        assert!(PieceVocab::parse("<unk>\t0\na\t-1\na\t-2\n").is_err());
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = PieceVocab::parse("<unk>\t0\nbroken\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
