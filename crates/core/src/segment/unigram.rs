//! In-process unigram segmentation over a sentencepiece `.vocab` file.
//!
//! Text is normalized the way sentencepiece does by default (NFKC, collapsed
//! whitespace, dummy `▁` prefix) and segmented with a Viterbi search for the
//! piece sequence with the highest total score.

use super::{Piece, Segmenter, WORD_START};
use crate::core::PieceVocab;
use crate::error::Result;
use std::path::Path;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

/// Score penalty applied to characters no piece covers.
const UNK_PENALTY: f32 = 10.0;

/// Unigram segmenter backed by a [`PieceVocab`].
#[derive(Debug, Clone)]
pub struct UnigramSegmenter {
    vocab: PieceVocab,
}

/// Best path ending at a char position.
#[derive(Debug, Clone, Copy)]
struct Node {
    score: f32,
    start: usize,
    id: u32,
}

impl UnigramSegmenter {
    /// Create a segmenter over an existing vocabulary.
    pub fn new(vocab: PieceVocab) -> Self {
        Self { vocab }
    }

    /// Load a `.vocab` file.
    pub fn load(path: &Path) -> Result<Self> {
        let vocab = PieceVocab::load(path)?;
        info!(
            path = %path.display(),
            pieces = vocab.len(),
            "loaded unigram vocabulary"
        );
        Ok(Self::new(vocab))
    }

    /// The underlying vocabulary.
    pub fn vocab(&self) -> &PieceVocab {
        &self.vocab
    }

    /// Normalize text into the form pieces are matched against.
    ///
    /// `"  Hello   world "` becomes `"▁Hello▁world"`.
    pub fn normalize(text: &str) -> String {
        let nfkc: String = text.nfkc().collect();
        let mut normalized = String::with_capacity(nfkc.len() + 8);
        for word in nfkc.split_whitespace() {
            normalized.push(WORD_START);
            normalized.push_str(word);
        }
        normalized
    }

    fn segment(&self, normalized: &str) -> Vec<Piece> {
        let chars: Vec<char> = normalized.chars().collect();
        let n = chars.len();
        if n == 0 {
            return Vec::new();
        }

        let unk_id = self.vocab.unk_id();
        let unk_score = self.vocab.min_score() - UNK_PENALTY;
        let max_len = self.vocab.max_piece_chars().max(1);

        let mut best: Vec<Option<Node>> = vec![None; n + 1];
        best[0] = Some(Node {
            score: 0.0,
            start: 0,
            id: unk_id,
        });

        let mut candidate = String::new();
        for start in 0..n {
            let Some(from) = best[start] else {
                continue;
            };

            let mut has_single_char = false;
            candidate.clear();
            for end in (start + 1)..=(start + max_len).min(n) {
                candidate.push(chars[end - 1]);
                let Some(id) = self.vocab.matchable_id(&candidate) else {
                    continue;
                };
                if end == start + 1 {
                    has_single_char = true;
                }
                let score = from.score + self.vocab.score(id).unwrap_or(unk_score);
                relax(&mut best[end], Node { score, start, id });
            }

            if !has_single_char {
                let score = from.score + unk_score;
                relax(
                    &mut best[start + 1],
                    Node {
                        score,
                        start,
                        id: unk_id,
                    },
                );
            }
        }

        let mut path = Vec::new();
        let mut end = n;
        while end > 0 {
            // Every position is reachable through the unknown fallback.
            let Some(node) = best[end] else {
                break;
            };
            path.push((node.start, end, node.id));
            end = node.start;
        }
        path.reverse();

        let mut pieces: Vec<Piece> = Vec::with_capacity(path.len());
        for (start, end, id) in path {
            let surface: String = chars[start..end].iter().collect();
            match pieces.last_mut() {
                Some(last) if id == unk_id && last.id == unk_id => last.surface.push_str(&surface),
                _ => pieces.push(Piece::new(surface, id)),
            }
        }
        pieces
    }
}

fn relax(slot: &mut Option<Node>, node: Node) {
    match slot {
        Some(current) if current.score >= node.score => {}
        _ => *slot = Some(node),
    }
}

impl Segmenter for UnigramSegmenter {
    fn encode(&self, text: &str) -> Result<Vec<Piece>> {
        let normalized = Self::normalize(text);
        let pieces = self.segment(&normalized);
        debug!(chars = normalized.chars().count(), pieces = pieces.len(), "segmented");
        Ok(pieces)
    }

    fn decode_pieces(&self, pieces: &[String]) -> Result<String> {
        let joined: String = pieces
            .concat()
            .chars()
            .map(|c| if c == WORD_START { ' ' } else { c })
            .collect();
        Ok(match joined.strip_prefix(' ') {
            Some(rest) => rest.to_string(),
            None => joined,
        })
    }

    fn piece_to_id(&self, piece: &str) -> u32 {
        self.vocab.piece_to_id(piece)
    }

    fn unk_id(&self) -> u32 {
        self.vocab.unk_id()
    }

    fn vocab_size(&self) -> usize {
        self.vocab.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter(entries: &[(&str, f32)]) -> UnigramSegmenter {
        let mut all = vec![("<unk>", 0.0), ("<s>", 0.0), ("</s>", 0.0)];
        all.extend_from_slice(entries);
        UnigramSegmenter::new(PieceVocab::from_entries(all).unwrap())
    }

    fn surfaces(seg: &UnigramSegmenter, text: &str) -> Vec<String> {
        seg.encode_as_pieces(text).unwrap()
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(UnigramSegmenter::normalize("  Hello \t world  "), "▁Hello▁world");
        assert_eq!(UnigramSegmenter::normalize(""), "");
        assert_eq!(UnigramSegmenter::normalize("   "), "");
    }

    #[test]
    fn test_normalize_applies_nfkc() {
        // U+FB01 LATIN SMALL LIGATURE FI
        assert_eq!(UnigramSegmenter::normalize("\u{fb01}ne"), "▁fine");
    }

    #[test]
    fn test_prefers_highest_scoring_path() {
        let seg = segmenter(&[
            ("▁", -2.0),
            ("h", -3.0),
            ("e", -3.0),
            ("▁he", -4.0),
            ("llo", -2.0),
            ("l", -3.0),
            ("o", -3.0),
            ("▁hello", -5.0),
        ]);
        assert_eq!(surfaces(&seg, "hello"), vec!["▁hello"]);
        assert_eq!(surfaces(&seg, "helo"), vec!["▁he", "l", "o"]);
    }

    #[test]
    fn test_unknown_chars_are_merged() {
        let seg = segmenter(&[("▁", -1.0), ("a", -1.0)]);
        let pieces = seg.encode("a xyz").unwrap();
        let unk = seg.unk_id();
        assert_eq!(
            pieces,
            vec![
                Piece::new("▁", 3),
                Piece::new("a", 4),
                Piece::new("▁", 3),
                Piece::new("xyz", unk),
            ]
        );
    }

    #[test]
    fn test_reserved_pieces_never_match_text() {
        let seg = segmenter(&[("▁", -1.0), ("<", -1.0), ("s", -1.0), (">", -1.0)]);
        assert_eq!(surfaces(&seg, "<s>"), vec!["▁", "<", "s", ">"]);
    }

    #[test]
    fn test_piece_lengths_cover_normalized_text() {
        let seg = segmenter(&[("▁the", -2.0), ("▁", -3.0), ("t", -4.0), ("he", -3.0)]);
        let text = "  the  quick thé ";
        let total: usize = seg.encode(text).unwrap().iter().map(Piece::char_len).sum();
        assert_eq!(total, UnigramSegmenter::normalize(text).chars().count());
    }

    #[test]
    fn test_decode_pieces_strips_dummy_prefix() {
        let seg = segmenter(&[("▁hello", -1.0), ("▁world", -1.0)]);
        let pieces = surfaces(&seg, "hello   world");
        assert_eq!(seg.decode_pieces(&pieces).unwrap(), "hello world");
        assert_eq!(seg.decode_pieces(&[]).unwrap(), "");
    }

    #[test]
    fn test_empty_text_has_no_pieces() {
        let seg = segmenter(&[("▁", -1.0)]);
        assert!(seg.encode("").unwrap().is_empty());
    }
}
