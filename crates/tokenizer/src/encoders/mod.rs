//! Text encoders and the registry they are looked up in.

pub mod args;
pub mod sentencepiece_bpe;

pub use args::{BpeArgs, SentencepieceArgs, SENTENCEPIECE};
pub use sentencepiece_bpe::{Segmentation, SentencepieceBpe};

use crate::io::PathResolver;
use shapepiece_core::{Registry, Result};
use std::sync::Arc;

/// A text -> piece-string encoder.
pub trait Bpe: Send + Sync {
    /// Encode a line into space-separated pieces.
    fn encode(&self, text: &str) -> Result<String>;

    /// Turn a piece string back into text.
    fn decode(&self, text: &str) -> String;

    /// Whether a piece starts a word.
    fn is_beginning_of_word(&self, token: &str) -> bool;
}

/// Builds an encoder from its arguments.
pub type BpeFactory = fn(&BpeArgs, &dyn PathResolver) -> Result<Arc<dyn Bpe>>;

/// Registry of encoders by name.
#[derive(Clone)]
pub struct BpeRegistry {
    inner: Registry<BpeFactory>,
}

impl BpeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            inner: Registry::new("bpe"),
        }
    }

    /// A registry holding every encoder this crate provides.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(SENTENCEPIECE, build_sentencepiece)
            .expect("builtin encoder names are unique");
        registry
    }

    pub fn register(&mut self, name: &str, factory: BpeFactory) -> Result<()> {
        self.inner.register(name, factory)
    }

    /// Build the encoder selected by `args.bpe`.
    pub fn build(&self, args: &BpeArgs, resolver: &dyn PathResolver) -> Result<Arc<dyn Bpe>> {
        let factory = self.inner.get(&args.bpe)?;
        factory(args, resolver)
    }

    pub fn names(&self) -> Vec<String> {
        self.inner.names()
    }
}

impl Default for BpeRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

fn build_sentencepiece(args: &BpeArgs, resolver: &dyn PathResolver) -> Result<Arc<dyn Bpe>> {
    Ok(Arc::new(SentencepieceBpe::from_args(
        &args.sentencepiece,
        resolver,
    )?))
}
