//! Resolution of model paths and identifiers to local files.

use shapepiece_core::{Result, TokenizerError};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the cache directory.
pub const CACHE_ENV: &str = "SHAPEPIECE_CACHE";

/// Turns a path or identifier into a local filesystem path.
pub trait PathResolver: Send + Sync {
    fn resolve(&self, path_or_url: &str) -> Result<PathBuf>;
}

/// Resolves local paths directly and URLs through a local cache directory.
///
/// Remote artifacts must already be present in the cache; nothing is
/// downloaded.
#[derive(Debug, Clone)]
pub struct CachedPathResolver {
    cache_dir: PathBuf,
}

impl CachedPathResolver {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Cache directory from `$SHAPEPIECE_CACHE`, else `$HOME/.cache/shapepiece`.
    pub fn from_env() -> Self {
        let cache_dir = env::var_os(CACHE_ENV)
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".cache/shapepiece")))
            .unwrap_or_else(|| PathBuf::from(".shapepiece-cache"));
        Self::new(cache_dir)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// File name a URL is cached under: the URL with every char outside
    /// `[A-Za-z0-9._-]` replaced by `_`.
    pub fn cache_file_name(url: &str) -> String {
        let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        without_scheme
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl Default for CachedPathResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PathResolver for CachedPathResolver {
    fn resolve(&self, path_or_url: &str) -> Result<PathBuf> {
        if is_url(path_or_url) {
            let cached = self.cache_dir.join(Self::cache_file_name(path_or_url));
            if cached.is_file() {
                debug!(url = path_or_url, path = %cached.display(), "resolved from cache");
                return Ok(cached);
            }
            return Err(TokenizerError::ResourceNotFound(format!(
                "{} is not cached (expected {})",
                path_or_url,
                cached.display()
            )));
        }

        let path = expand_home(path_or_url);
        if path.exists() {
            return Ok(path);
        }
        Err(TokenizerError::ResourceNotFound(format!(
            "file {} does not exist",
            path.display()
        )))
    }
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), env::var_os("HOME")) {
        (Some(rest), Some(home)) => Path::new(&home).join(rest),
        _ => PathBuf::from(path),
    }
}
