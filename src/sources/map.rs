//! In-memory property source for system-level properties.

use super::{PropertySource, SYSTEM_PRIORITY};
use crate::error::Result;
use std::collections::HashMap;

/// Property source over an explicit set of key/value pairs.
///
/// This is where the host process hands over its own "system" properties,
/// typically values parsed from command-line flags before the store is built.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::sources::{MapSource, PropertySource};
///
/// let source = MapSource::new("system").with_property("environment", "dev");
/// assert_eq!(source.load().unwrap()["environment"], "dev");
/// ```
pub struct MapSource {
    name: String,
    values: HashMap<String, String>,
    priority: i32,
}

impl MapSource {
    /// Create an empty named source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
            priority: SYSTEM_PRIORITY,
        }
    }

    /// Add a single property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Add many properties at once.
    pub fn with_properties<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl PropertySource for MapSource {
    fn load(&self) -> Result<HashMap<String, String>> {
        Ok(self.values.clone())
    }

    fn name(&self) -> String {
        format!("map:{}", self.name)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
