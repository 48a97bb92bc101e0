//! The merged, read-only property map.

use crate::core::PropertyStoreBuilder;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Merged key/value configuration for the active environment.
///
/// A store is built once from its layered sources and never mutated
/// afterwards, so it can be shared freely between threads behind an `Arc`.
/// Keys are case-sensitive and values are untyped strings; consumers parse
/// them as needed.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::core::PropertyStore;
///
/// let store = PropertyStore::from_map("local", [("BASE_URL", "https://example.com")]);
/// assert_eq!(store.get("BASE_URL"), Some("https://example.com"));
/// assert_eq!(store.get("base_url"), None);
/// assert_eq!(store.environment(), "local");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyStore {
    values: HashMap<String, String>,
    environment: String,
    sources: Vec<String>,
}

impl PropertyStore {
    /// Create a new builder for loading a store from layered sources.
    pub fn builder() -> PropertyStoreBuilder {
        PropertyStoreBuilder::new()
    }

    /// Create a store directly from a set of properties, bypassing all sources.
    ///
    /// Intended for tests and for hosts that already hold their configuration.
    pub fn from_map<I, K, V>(environment: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            environment: environment.into(),
            sources: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        values: HashMap<String, String>,
        environment: String,
        sources: Vec<String>,
    ) -> Self {
        Self {
            values,
            environment,
            sources,
        }
    }

    /// Look up a property.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a property, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertyNotFound`] carrying `key` when the store has
    /// no value for it.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::property_not_found(key))
    }

    /// Whether the store holds a value for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of properties in the store.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no properties at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The environment label this store was loaded for.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Names of the sources that fed this store, in load order.
    pub fn source_names(&self) -> &[String] {
        &self.sources
    }

    /// Iterate over all properties in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
