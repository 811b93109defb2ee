//! Text normalization applied before segmentation.

pub mod normalize;

pub use normalize::{lowercase_preserving_len, remove_combining_marks, strip_accents};
