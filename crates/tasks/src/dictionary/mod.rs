//! Symbol dictionaries used by the task plugins.
//!
//! A [`Dictionary`] maps symbols to contiguous indices and keeps a count per
//! symbol. The first indices are reserved for `<s>`, `<pad>`, `</s>` and
//! `<unk>`; a [`DictionaryKind::TokenShapes`] dictionary additionally
//! reserves one slot per [`TokenShape`] so every symbol can be paired with
//! the index of its shape.

pub mod shapes;

pub use shapes::TokenShape;

use crate::tokenize::tokenize_line;
use ahash::AHashMap;
use compact_str::CompactString;
use rayon::prelude::*;
use shapepiece_core::{Result, TokenizerError, BOS_PIECE, EOS_PIECE, PAD_PIECE, UNK_PIECE};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Symbol written after a count to replace an existing entry on load.
const OVERWRITE_FLAG: &str = "#fairseq:overwrite";

/// Which reserved slots a dictionary carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DictionaryKind {
    /// Only `<s>`, `<pad>`, `</s>`, `<unk>`
    #[default]
    Plain,
    /// Reserved symbols plus one slot per token shape
    TokenShapes,
}

/// Options for [`Dictionary::finalize`] and dictionary building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeOptions {
    /// Drop symbols seen fewer times than this (negative keeps all)
    pub threshold: i64,
    /// Keep at most this many symbols, reserved ones included (negative keeps all)
    pub nwords: i64,
    /// Pad the dictionary size to a multiple of this
    pub padding_factor: usize,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self {
            threshold: -1,
            nwords: -1,
            padding_factor: 8,
        }
    }
}

/// Symbol table with counts.
#[derive(Debug, Clone)]
pub struct Dictionary {
    kind: DictionaryKind,
    symbols: Vec<CompactString>,
    counts: Vec<u64>,
    indices: AHashMap<CompactString, u32>,
    bos_index: u32,
    pad_index: u32,
    eos_index: u32,
    unk_index: u32,
    /// Index of the first shape slot, for token-shapes dictionaries
    shape_base: Option<u32>,
    nspecial: usize,
}

impl Dictionary {
    /// A dictionary holding only its reserved symbols.
    pub fn new(kind: DictionaryKind) -> Self {
        let mut dict = Self {
            kind,
            symbols: Vec::new(),
            counts: Vec::new(),
            indices: AHashMap::new(),
            bos_index: 0,
            pad_index: 0,
            eos_index: 0,
            unk_index: 0,
            shape_base: None,
            nspecial: 0,
        };
        dict.bos_index = dict.add_symbol(BOS_PIECE, 1);
        dict.pad_index = dict.add_symbol(PAD_PIECE, 1);
        dict.eos_index = dict.add_symbol(EOS_PIECE, 1);
        dict.unk_index = dict.add_symbol(UNK_PIECE, 1);
        if kind == DictionaryKind::TokenShapes {
            dict.shape_base = Some(dict.symbols.len() as u32);
            for shape in TokenShape::ALL {
                dict.add_symbol(shape.symbol(), 1);
            }
        }
        dict.nspecial = dict.symbols.len();
        dict
    }

    /// A dictionary with token-shape slots.
    pub fn token_shapes() -> Self {
        Self::new(DictionaryKind::TokenShapes)
    }

    pub fn kind(&self) -> DictionaryKind {
        self.kind
    }

    /// Add `n` occurrences of `word`, returning its index.
    pub fn add_symbol(&mut self, word: &str, n: u64) -> u32 {
        if let Some(&idx) = self.indices.get(word) {
            self.counts[idx as usize] += n;
            return idx;
        }
        let idx = self.symbols.len() as u32;
        let word = CompactString::new(word);
        self.indices.insert(word.clone(), idx);
        self.symbols.push(word);
        self.counts.push(n);
        idx
    }

    /// Index of `symbol`, the unknown index if absent.
    pub fn index(&self, symbol: &str) -> u32 {
        self.indices.get(symbol).copied().unwrap_or(self.unk_index)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.indices.contains_key(symbol)
    }

    /// Symbol at `idx`; out-of-range indices read as `<unk>`.
    pub fn symbol(&self, idx: u32) -> &str {
        self.symbols
            .get(idx as usize)
            .map_or(UNK_PIECE, |s| s.as_str())
    }

    pub fn count(&self, idx: u32) -> u64 {
        self.counts.get(idx as usize).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of reserved leading slots.
    pub fn nspecial(&self) -> usize {
        self.nspecial
    }

    pub fn bos(&self) -> u32 {
        self.bos_index
    }

    pub fn pad(&self) -> u32 {
        self.pad_index
    }

    pub fn eos(&self) -> u32 {
        self.eos_index
    }

    pub fn unk(&self) -> u32 {
        self.unk_index
    }

    /// Indices of the tokens of `line`, optionally followed by `</s>`.
    pub fn encode_line(&self, line: &str, append_eos: bool) -> Vec<u32> {
        let mut ids: Vec<u32> = tokenize_line(line)
            .iter()
            .map(|token| self.index(token))
            .collect();
        if append_eos {
            ids.push(self.eos_index);
        }
        ids
    }

    /// Space-joined symbols of `ids`, padding skipped.
    pub fn string(&self, ids: &[u32]) -> String {
        ids.iter()
            .filter(|&&id| id != self.pad_index)
            .map(|&id| self.symbol(id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Shape class of the symbol at `idx`. Reserved symbols are uncased.
    pub fn shape_of(&self, idx: u32) -> TokenShape {
        if (idx as usize) < self.nspecial {
            return TokenShape::Uncased;
        }
        TokenShape::of(self.symbol(idx))
    }

    /// Shape class of a token, whether or not it is in the dictionary.
    pub fn shape_of_token(&self, token: &str) -> TokenShape {
        match self.indices.get(token) {
            Some(&idx) => self.shape_of(idx),
            None => TokenShape::of(token),
        }
    }

    /// Index of the slot reserved for `shape`.
    pub fn shape_slot(&self, shape: TokenShape) -> Result<u32> {
        let base = self.shape_base.ok_or_else(|| {
            TokenizerError::InvalidConfig(
                "dictionary has no token shape slots; load it as a token-shapes dictionary"
                    .to_string(),
            )
        })?;
        Ok(base + shape.ordinal() as u32)
    }

    /// Index of the shape slot of the symbol at `idx`.
    pub fn shape_index(&self, idx: u32) -> Result<u32> {
        self.shape_slot(self.shape_of(idx))
    }

    /// Shape slot indices aligned with [`Dictionary::encode_line`].
    pub fn encode_line_shapes(&self, line: &str, append_eos: bool) -> Result<Vec<u32>> {
        let mut shapes = tokenize_line(line)
            .iter()
            .map(|token| self.shape_slot(self.shape_of_token(token)))
            .collect::<Result<Vec<_>>>()?;
        if append_eos {
            shapes.push(self.shape_slot(TokenShape::Uncased)?);
        }
        Ok(shapes)
    }

    /// Sort by frequency, prune, and pad the dictionary.
    ///
    /// Reserved symbols keep their indices. The rest are ordered by count
    /// (descending, ties by symbol), cut at `threshold` and `nwords`, and the
    /// size is padded to a multiple of `padding_factor` with placeholder
    /// symbols.
    pub fn finalize(&mut self, options: FinalizeOptions) {
        let nwords = if options.nwords <= 0 {
            self.len()
        } else {
            options.nwords as usize
        };

        let mut rest: Vec<(CompactString, u64)> = self.symbols[self.nspecial..]
            .iter()
            .cloned()
            .zip(self.counts[self.nspecial..].iter().copied())
            .collect();
        rest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let nspecial = self.nspecial;
        self.symbols.truncate(nspecial);
        self.counts.truncate(nspecial);
        self.indices.retain(|_, idx| (*idx as usize) < nspecial);

        let keep = nwords.saturating_sub(nspecial);
        for (symbol, count) in rest.into_iter().take(keep) {
            if options.threshold >= 0 && count < options.threshold as u64 {
                break;
            }
            self.add_symbol(&symbol, count);
        }

        self.pad_to_multiple(options.padding_factor);
    }

    /// Append placeholder symbols until the size is a multiple of `factor`.
    pub fn pad_to_multiple(&mut self, factor: usize) {
        if factor <= 1 {
            return;
        }
        let mut i = 0;
        while self.len() % factor != 0 {
            let symbol = format!("madeupword{:04}", i);
            self.add_symbol(&symbol, 0);
            i += 1;
        }
    }

    /// Load a `symbol count` file.
    pub fn load(path: &Path, kind: DictionaryKind) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TokenizerError::io(path, e))?;
        let mut dict = Self::new(kind);
        dict.add_from_str(&content)?;
        debug!(path = %path.display(), symbols = dict.len(), "loaded dictionary");
        Ok(dict)
    }

    /// Add the entries of a `symbol count` listing.
    ///
    /// A trailing `#fairseq:overwrite` replaces an existing entry instead of
    /// failing on the duplicate.
    pub fn add_from_str(&mut self, content: &str) -> Result<()> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let malformed = || {
                TokenizerError::Dictionary(format!(
                    "Incorrect dictionary format at line {}, expected '<token> <cnt> [flags]': '{}'",
                    line_num + 1,
                    line
                ))
            };

            let (rest, last) = line.rsplit_once(' ').ok_or_else(malformed)?;
            let (word, count, overwrite) = if last == OVERWRITE_FLAG {
                let (word, count) = rest.rsplit_once(' ').ok_or_else(malformed)?;
                (word, count, true)
            } else {
                (rest, last, false)
            };
            let count: u64 = count.parse().map_err(|_| malformed())?;

            match self.indices.get(word).copied() {
                Some(idx) if overwrite => self.counts[idx as usize] = count,
                Some(_) => {
                    return Err(TokenizerError::Dictionary(format!(
                        "Duplicate word found when loading dictionary: '{}' (line {}). \
                         Duplicate words can overwrite earlier ones by adding the {} flag",
                        word,
                        line_num + 1,
                        OVERWRITE_FLAG
                    )));
                }
                None => {
                    self.add_symbol(word, count);
                }
            }
        }
        Ok(())
    }

    /// Write every non-reserved symbol as a `symbol count` line.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = fs::File::create(path).map_err(|e| TokenizerError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        for (symbol, count) in self.symbols[self.nspecial..]
            .iter()
            .zip(&self.counts[self.nspecial..])
        {
            writeln!(writer, "{} {}", symbol, count).map_err(|e| TokenizerError::io(path, e))?;
        }
        writer.flush().map_err(|e| TokenizerError::io(path, e))
    }

    /// Count the tokens of a text file into `dict`, one `</s>` per line.
    ///
    /// Lines are split into `workers` chunks that are counted in parallel.
    pub fn add_file_to_dictionary<F>(
        path: &Path,
        dict: &mut Dictionary,
        tokenize: F,
        workers: usize,
    ) -> Result<()>
    where
        F: Fn(&str) -> Vec<String> + Sync,
    {
        let content = fs::read_to_string(path).map_err(|e| TokenizerError::io(path, e))?;
        let lines: Vec<&str> = content.lines().collect();
        if lines.is_empty() {
            return Ok(());
        }
        let chunk_size = lines.len().div_ceil(workers.max(1));

        let counts = lines
            .par_chunks(chunk_size)
            .map(|chunk| {
                let mut counts: AHashMap<String, u64> = AHashMap::new();
                for line in chunk {
                    for token in tokenize(line) {
                        *counts.entry(token).or_insert(0) += 1;
                    }
                    *counts.entry(EOS_PIECE.to_string()).or_insert(0) += 1;
                }
                counts
            })
            .reduce(AHashMap::new, |mut acc, counts| {
                for (token, count) in counts {
                    *acc.entry(token).or_insert(0) += count;
                }
                acc
            });

        let mut counts: Vec<(String, u64)> = counts.into_iter().collect();
        counts.sort();
        for (token, count) in counts {
            dict.add_symbol(&token, count);
        }
        debug!(path = %path.display(), lines = lines.len(), "counted file");
        Ok(())
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new(DictionaryKind::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_symbols() {
        let dict = Dictionary::default();
        assert_eq!(dict.bos(), 0);
        assert_eq!(dict.pad(), 1);
        assert_eq!(dict.eos(), 2);
        assert_eq!(dict.unk(), 3);
        assert_eq!(dict.nspecial(), 4);
        assert_eq!(dict.symbol(2), "</s>");
    }

    #[test]
    fn test_token_shapes_reserve_slots() {
        let dict = Dictionary::token_shapes();
        assert_eq!(dict.nspecial(), 9);
        assert_eq!(dict.index("<shape:lower>"), 4);
        assert_eq!(dict.shape_slot(TokenShape::Uncased).unwrap(), 8);
    }

    #[test]
    fn test_add_symbol_counts() {
        let mut dict = Dictionary::default();
        let a = dict.add_symbol("▁a", 1);
        assert_eq!(dict.add_symbol("▁a", 2), a);
        assert_eq!(dict.count(a), 3);
        assert_eq!(dict.index("▁missing"), dict.unk());
    }

    #[test]
    fn test_shapes_on_plain_dictionary_fail() {
        let mut dict = Dictionary::default();
        let idx = dict.add_symbol("▁Hello", 1);
        assert_eq!(dict.shape_of(idx), TokenShape::Title);
        assert!(matches!(
            dict.shape_index(idx),
            Err(TokenizerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_shape_index() {
        let mut dict = Dictionary::token_shapes();
        let hello = dict.add_symbol("▁Hello", 1);
        let nasa = dict.add_symbol("▁NASA", 1);
        assert_eq!(dict.shape_index(hello).unwrap(), dict.index("<shape:title>"));
        assert_eq!(dict.shape_index(nasa).unwrap(), dict.index("<shape:upper>"));
        assert_eq!(
            dict.shape_index(dict.eos()).unwrap(),
            dict.index("<shape:uncased>")
        );
    }

    #[test]
    fn test_encode_line_and_shapes_align() {
        let mut dict = Dictionary::token_shapes();
        dict.add_symbol("▁Hello", 1);
        dict.add_symbol("▁world", 1);

        let line = "▁Hello ▁world ▁Unknown <unk>";
        let ids = dict.encode_line(line, true);
        let shapes = dict.encode_line_shapes(line, true).unwrap();
        assert_eq!(ids.len(), shapes.len());
        assert_eq!(ids[2], dict.unk());
        assert_eq!(*ids.last().unwrap(), dict.eos());
        assert_eq!(
            dict.string(&shapes),
            "<shape:title> <shape:lower> <shape:title> <shape:uncased> <shape:uncased>"
        );
    }

    #[test]
    fn test_finalize_sorts_prunes_and_pads() {
        let mut dict = Dictionary::default();
        dict.add_symbol("b", 5);
        dict.add_symbol("a", 5);
        dict.add_symbol("c", 9);
        dict.add_symbol("rare", 1);

        dict.finalize(FinalizeOptions {
            threshold: 2,
            nwords: -1,
            padding_factor: 8,
        });

        assert_eq!(dict.symbol(4), "c");
        assert_eq!(dict.symbol(5), "a");
        assert_eq!(dict.symbol(6), "b");
        assert_eq!(dict.symbol(7), "madeupword0000");
        assert!(!dict.contains("rare"));
        assert_eq!(dict.len(), 8);
        assert_eq!(dict.index("a"), 5);
    }

    #[test]
    fn test_finalize_nwords_counts_reserved() {
        let mut dict = Dictionary::default();
        for (i, word) in ["w1", "w2", "w3"].iter().enumerate() {
            dict.add_symbol(word, 10 - i as u64);
        }
        dict.finalize(FinalizeOptions {
            threshold: -1,
            nwords: 5,
            padding_factor: 1,
        });
        assert_eq!(dict.len(), 5);
        assert_eq!(dict.symbol(4), "w1");
    }

    #[test]
    fn test_save_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.txt");

        let mut dict = Dictionary::token_shapes();
        dict.add_symbol("▁Hello", 7);
        dict.add_symbol("▁world", 3);
        dict.save(&path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "▁Hello 7\n▁world 3\n"
        );

        let loaded = Dictionary::load(&path, DictionaryKind::TokenShapes).unwrap();
        assert_eq!(loaded.len(), dict.len());
        assert_eq!(loaded.index("▁world"), dict.index("▁world"));
        assert_eq!(loaded.count(loaded.index("▁Hello")), 7);
    }

    #[test]
    fn test_load_rejects_malformed_lines() {
        let mut dict = Dictionary::default();
        let err = dict.add_from_str("▁a 1\nbroken\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let mut dict = Dictionary::default();
        assert!(dict.add_from_str("▁a notanumber\n").is_err());
    }

    #[test]
    fn test_load_duplicates_need_overwrite_flag() {
        let mut dict = Dictionary::default();
        assert!(dict.add_from_str("▁a 1\n▁a 2\n").is_err());

        let mut dict = Dictionary::default();
        dict.add_from_str("▁a 1\n▁a 2 #fairseq:overwrite\n").unwrap();
        assert_eq!(dict.count(dict.index("▁a")), 2);
    }

    #[test]
    fn test_add_file_to_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.txt");
        std::fs::write(&path, "▁a ▁b\n▁a\n\n▁c ▁a\n").unwrap();

        for workers in [1, 3] {
            let mut dict = Dictionary::default();
            Dictionary::add_file_to_dictionary(&path, &mut dict, tokenize_line, workers)
                .unwrap();
            assert_eq!(dict.count(dict.index("▁a")), 3);
            assert_eq!(dict.count(dict.index("▁b")), 1);
            // one per line plus the initial reservation
            assert_eq!(dict.count(dict.eos()), 5);
        }
    }
}
