//! Capitalization classes carried as side-information next to each symbol.

use shapepiece_core::WORD_START;

/// Capitalization class of a symbol's surface form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenShape {
    /// Every cased letter is lower-case: `▁hello`
    Lower,
    /// Several cased letters, all upper-case: `▁NASA`
    Upper,
    /// Leading upper-case letter, the rest lower-case: `▁Hello`, `A`
    Title,
    /// Any other mix: `▁iPhone`
    Mixed,
    /// No cased letters at all: `42`, `,`, `東京`
    Uncased,
}

impl TokenShape {
    /// Every shape, in the order their reserved slots are laid out.
    pub const ALL: [TokenShape; 5] = [
        TokenShape::Lower,
        TokenShape::Upper,
        TokenShape::Title,
        TokenShape::Mixed,
        TokenShape::Uncased,
    ];

    /// Classify a symbol. A leading `▁` is ignored and control symbols
    /// such as `<mask>` are uncased.
    pub fn of(symbol: &str) -> Self {
        if is_control(symbol) {
            return TokenShape::Uncased;
        }
        let body = symbol.strip_prefix(WORD_START).unwrap_or(symbol);
        let cased: Vec<char> = body
            .chars()
            .filter(|c| c.is_lowercase() || c.is_uppercase())
            .collect();

        let Some((first, rest)) = cased.split_first() else {
            return TokenShape::Uncased;
        };

        if cased.iter().all(|c| c.is_lowercase()) {
            TokenShape::Lower
        } else if first.is_uppercase() && rest.iter().all(|c| c.is_lowercase()) {
            TokenShape::Title
        } else if cased.iter().all(|c| c.is_uppercase()) {
            TokenShape::Upper
        } else {
            TokenShape::Mixed
        }
    }

    /// Symbol reserving this shape's slot in a token-shapes dictionary.
    pub fn symbol(self) -> &'static str {
        match self {
            TokenShape::Lower => "<shape:lower>",
            TokenShape::Upper => "<shape:upper>",
            TokenShape::Title => "<shape:title>",
            TokenShape::Mixed => "<shape:mixed>",
            TokenShape::Uncased => "<shape:uncased>",
        }
    }

    /// Position of this shape within [`TokenShape::ALL`].
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// `<...>` symbols never stand for text.
fn is_control(symbol: &str) -> bool {
    symbol.len() > 2 && symbol.starts_with('<') && symbol.ends_with('>')
}
