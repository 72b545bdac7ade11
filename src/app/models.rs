//! Core data types shared across the scraping and download pipeline

use std::collections::HashMap;

/// A single attribute occurrence inside a start tag, in encounter order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrPair {
    pub name: String,
    pub value: String,
}

impl AttrPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Mapping from lower-cased metadata key to its content value.
///
/// Keys are unique and the last write for a key wins: Open Graph and
/// Twitter Card keys share one namespace. The map is populated during
/// parsing and frozen once collection finishes; no mutation is exposed
/// outside the crate.
#[derive(Debug, Clone, Default)]
pub struct MetaMap {
    entries: HashMap<String, String>,
}

impl MetaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by its (already lower-cased) key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a value under the lower-cased key; a later write for the
    /// same key replaces the earlier one
    pub(crate) fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_lowercase(), value.into());
    }
}

#[cfg(test)]
impl MetaMap {
    /// Build a map directly from pairs; test construction helper
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.insert(key, *value);
        }
        map
    }
}

/// Pixel dimensions parsed from two decimal-string metadata values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub x: u32,
    pub y: u32,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}
