//! Text transforms applied before shape segmentation.
//!
//! The shape encoder needs two of them: accent stripping and a lower-case
//! mapping that keeps char offsets valid.

use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

const CAPITAL_SIGMA: char = 'Σ';
const SMALL_SIGMA: char = 'σ';
const FINAL_SIGMA: char = 'ς';

/// NFD followed by removal of every combining mark: `"Café"` -> `"Cafe"`.
pub fn strip_accents(text: &str) -> String {
    let decomposed: String = text.nfd().collect();
    remove_combining_marks(&decomposed)
}

/// Drop every char with a non-zero canonical combining class.
pub fn remove_combining_marks(text: &str) -> String {
    text.chars()
        .filter(|&c| canonical_combining_class(c) == 0)
        .collect()
}

/// Lower-case `text` without changing its length in chars.
///
/// Whole-string lower-casing is used when it keeps the length, so context
/// rules such as the Greek final sigma apply. Otherwise chars are mapped one
/// by one: a char whose lower-case mapping is not exactly one char (`'İ'`
/// maps to `"i̇"`) is kept unchanged, and `Σ` ending a word still becomes `ς`.
pub fn lowercase_preserving_len(text: &str) -> String {
    let lower = text.to_lowercase();
    let len = text.chars().count();
    if lower.chars().count() == len {
        return lower;
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if c == CAPITAL_SIGMA {
                return if ends_word(&chars, i) {
                    FINAL_SIGMA
                } else {
                    SMALL_SIGMA
                };
            }
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(single), None) => single,
                _ => c,
            }
        })
        .collect()
}

/// Whether the sigma at `i` follows a letter and precedes none.
fn ends_word(chars: &[char], i: usize) -> bool {
    let after_letter = i > 0 && chars[i - 1].is_alphabetic();
    let before_letter = chars.get(i + 1).is_some_and(|c| c.is_alphabetic());
    after_letter && !before_letter
}
