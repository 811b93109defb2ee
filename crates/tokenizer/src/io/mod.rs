//! Locating model artifacts on disk.

pub mod resolve;

pub use resolve::{CachedPathResolver, PathResolver, CACHE_ENV};
