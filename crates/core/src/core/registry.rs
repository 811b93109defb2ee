//! Name -> factory registries.
//!
//! Plugins (encoders, tasks) are looked up by the string identifier used in
//! configuration. A registry is an ordinary value built at startup and handed
//! to whoever resolves the configuration.

use crate::error::{Result, TokenizerError};
use ahash::AHashMap;

/// Registry mapping identifiers to entries of type `T` (usually a factory fn).
#[derive(Debug, Clone)]
pub struct Registry<T> {
    /// What is being registered, used in error messages ("task", "bpe", ...)
    kind: &'static str,
    entries: AHashMap<String, T>,
}

impl<T> Registry<T> {
    /// Create an empty registry for the given kind of entry.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: AHashMap::new(),
        }
    }

    /// Register an entry. Registering the same name twice is an error.
    pub fn register(&mut self, name: impl Into<String>, entry: T) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(TokenizerError::DuplicateRegistryEntry {
                kind: self.kind,
                name,
            });
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Result<&T> {
        self.entries
            .get(name)
            .ok_or_else(|| TokenizerError::UnknownRegistryEntry {
                kind: self.kind,
                name: name.to_string(),
                known: self.names(),
            })
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// The kind of entry this registry holds.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry: Registry<fn() -> u32> = Registry::new("thing");
        registry.register("one", || 1).unwrap();
        registry.register("two", || 2).unwrap();

        assert_eq!((registry.get("two").unwrap())(), 2);
        assert_eq!(registry.names(), vec!["one", "two"]);
        assert!(registry.contains("one"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = Registry::new("thing");
        registry.register("one", 1).unwrap();
        let err = registry.register("one", 2).unwrap_err();
        assert!(matches!(err, TokenizerError::DuplicateRegistryEntry { .. }));
        assert_eq!(*registry.get("one").unwrap(), 1);
    }

    #[test]
    fn test_unknown_name_lists_known_entries() {
        let mut registry = Registry::new("task");
        registry.register("masked_lm", ()).unwrap();
        let err = registry.get("nope").unwrap_err();
        assert_eq!(err.to_string(), "Unknown task 'nope' (known: masked_lm)");
    }
}
