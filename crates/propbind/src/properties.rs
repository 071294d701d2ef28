// crates/propbind/src/properties.rs
// ============================================================================
// Module: Property Map
// Description: Ordered string-to-string mapping used as binding input.
// Purpose: Preserve first-seen key order for diagnostics with unique keys.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`PropertyMap`] is the raw input to binding: unique, case-sensitive keys
//! mapped to string values. Insertion order has no effect on binding results
//! but is preserved so diagnostics list findings in the order an operator
//! wrote them.
//!
//! Values may hold secrets. `Debug` output lists keys only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when building a property map with unique-key semantics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyMapError {
    /// The same key was inserted twice.
    #[error("duplicate property: {0}")]
    DuplicateKey(String),
}

// ============================================================================
// SECTION: Property Map
// ============================================================================

/// Ordered, unique-key property mapping.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    /// Entries in first-seen order.
    entries: Vec<(String, String)>,
    /// Key to entry position.
    index: HashMap<String, usize>,
}

impl PropertyMap {
    /// Creates an empty property map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from pairs, rejecting duplicate keys.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyMapError::DuplicateKey`] when a key repeats.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, PropertyMapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.insert(key, value)?;
        }
        Ok(map)
    }

    /// Inserts a new key, failing if it is already present.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyMapError::DuplicateKey`] when the key exists.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), PropertyMapError> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(PropertyMapError::DuplicateKey(key));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value.into()));
        Ok(())
    }

    /// Sets a key, replacing any existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.index.get(&key).and_then(|position| self.entries.get_mut(*position))
        {
            entry.1 = value;
            return;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
    }

    /// Overlays another map on top of this one; later values win.
    pub fn overlay(&mut self, other: &Self) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .and_then(|position| self.entries.get(*position))
            .map(|(_, value)| value.as_str())
    }

    /// Returns true when the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Iterates keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for PropertyMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl fmt::Debug for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMap").field("keys", &self.keys().collect::<Vec<_>>()).finish()
    }
}
