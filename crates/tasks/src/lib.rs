//! Shapepiece-tasks - token-shape dictionaries and the tasks that use them
//!
//! Training data encoded with shape encoding keeps the original casing of
//! every piece. The dictionaries here reserve one slot per capitalization
//! class so a model can be fed the symbol and its shape side by side.
//!
//! # Example
//!
//! ```rust
//! use shapepiece_tasks::{Dictionary, TokenShape};
//!
//! let mut dict = Dictionary::token_shapes();
//! let idx = dict.add_symbol("▁Hello", 1);
//! assert_eq!(dict.shape_of(idx), TokenShape::Title);
//! assert_eq!(dict.shape_index(idx)?, dict.shape_slot(TokenShape::Title)?);
//! # Ok::<(), shapepiece_tasks::TokenizerError>(())
//! ```

pub use shapepiece_core::{Result, TokenizerError};

pub mod dictionary;
pub use dictionary::{Dictionary, DictionaryKind, FinalizeOptions, TokenShape};

pub mod tokenize;
pub use tokenize::tokenize_line;

pub mod tasks;
pub use tasks::{
    BuildOptions, MaskedLmWithTokenShapesTask, SentencePredictionWithTokenShapesTask, Task,
    TaskArgs, TaskEntry, TaskRegistry, MASK_SYMBOL,
};
