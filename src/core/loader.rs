//! Property loader that merges multiple sources.

use crate::error::{Error, Result};
use crate::sources::PropertySource;
use std::collections::HashMap;
use tracing::debug;

/// Result of merging every source of a loader.
#[derive(Debug, Default)]
pub(crate) struct MergedProperties {
    pub(crate) values: HashMap<String, String>,
    pub(crate) sources: Vec<String>,
}

/// Loads and merges properties from multiple sources.
///
/// The loader handles precedence by sorting sources by priority and merging them
/// in order (lower priority first, higher priority sources overwrite). Sources
/// with equal priority keep the order they were added in.
pub(crate) struct PropertyLoader {
    sources: Vec<Box<dyn PropertySource>>,
}

impl PropertyLoader {
    /// Create a new property loader.
    pub(crate) fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a property source.
    pub(crate) fn add_source(&mut self, source: Box<dyn PropertySource>) {
        self.sources.push(source);
    }

    /// Load and merge properties from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] naming the failing source if any source fails
    /// to load. No partial result is returned.
    pub(crate) fn load(&self) -> Result<MergedProperties> {
        let mut merged = MergedProperties::default();

        for source in self.sorted() {
            let name = source.name();
            let values = source.load().map_err(|e| match e {
                Error::Load(msg) => Error::Load(format!("Failed to load source '{}': {}", name, msg)),
                other => Error::Load(format!("Failed to load source '{}': {}", name, other)),
            })?;

            debug!(source = %name, entries = values.len(), "loaded property source");
            merged.values.extend(values);
            merged.sources.push(name);
        }

        Ok(merged)
    }

    /// Get the list of source names in load order.
    pub(crate) fn source_names(&self) -> Vec<String> {
        self.sorted().map(|s| s.name()).collect()
    }

    fn sorted(&self) -> impl Iterator<Item = &dyn PropertySource> {
        let mut sorted: Vec<_> = self.sources.iter().map(|s| s.as_ref()).collect();
        sorted.sort_by_key(|s| s.priority());
        sorted.into_iter()
    }
}

impl Default for PropertyLoader {
    fn default() -> Self {
        Self::new()
    }
}
