//! Vocabulary and registry primitives shared by every shapepiece crate.

pub mod registry;
pub mod vocab;

pub use registry::Registry;
pub use vocab::{
    is_reserved, PieceIds, PieceVocab, BOS_PIECE, EOS_PIECE, PAD_PIECE, RESERVED_PIECES,
    UNK_PIECE,
};
