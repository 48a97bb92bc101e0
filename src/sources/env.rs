//! Environment variable property source.

use super::{ENV_VAR_PRIORITY, PropertySource};
use crate::error::Result;
use std::collections::HashMap;

/// Environment variable property source.
///
/// Loads process environment variables with their names kept verbatim, so a
/// variable `BASE_URL` resolves the property key `BASE_URL` and nothing else.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::sources::{EnvSource, PropertySource};
///
/// // Only variables starting with "API_" are loaded, keys keep the prefix.
/// let source = EnvSource::new().with_prefix("API_");
/// assert_eq!(source.name(), "env:API_*");
/// ```
pub struct EnvSource {
    prefix: Option<String>,
    vars: Option<Vec<(String, String)>>,
    priority: i32,
}

impl EnvSource {
    /// Create a source reading the whole process environment.
    pub fn new() -> Self {
        Self {
            prefix: None,
            vars: None,
            priority: ENV_VAR_PRIORITY,
        }
    }

    /// Create a source over an explicit list of variables instead of the
    /// process environment.
    ///
    /// Useful in tests, where mutating the real environment races with other
    /// threads.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reqtemplate::sources::{EnvSource, PropertySource};
    ///
    /// let source = EnvSource::from_vars([("environment", "dev")]);
    /// let map = source.load().unwrap();
    /// assert_eq!(map.get("environment").map(String::as_str), Some("dev"));
    /// ```
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: None,
            vars: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            priority: ENV_VAR_PRIORITY,
        }
    }

    /// Only load variables whose name starts with `prefix`.
    ///
    /// The prefix is not stripped from the resulting keys.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn accepts(&self, key: &str) -> bool {
        self.prefix
            .as_deref()
            .is_none_or(|prefix| key.starts_with(prefix))
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertySource for EnvSource {
    fn load(&self) -> Result<HashMap<String, String>> {
        let map = match &self.vars {
            Some(vars) => vars
                .iter()
                .filter(|(k, _)| self.accepts(k))
                .cloned()
                .collect(),
            // Non-unicode variables cannot be property values; skip them.
            None => std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .filter(|(k, _)| self.accepts(k))
                .collect(),
        };

        Ok(map)
    }

    fn name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("env:{}*", prefix),
            None => "env:*".to_string(),
        }
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_source_creation() {
        let source = EnvSource::new();
        assert!(source.prefix.is_none());
        assert_eq!(source.priority(), 200);
    }

    #[test]
    fn test_with_priority() {
        let source = EnvSource::new().with_priority(400);
        assert_eq!(source.priority(), 400);
    }

    #[test]
    fn test_name() {
        assert_eq!(EnvSource::new().name(), "env:*");
        assert_eq!(EnvSource::new().with_prefix("APP_").name(), "env:APP_*");
    }

    #[test]
    fn test_explicit_vars_keep_case() {
        let source = EnvSource::from_vars([("BASE_URL", "https://a"), ("base_url", "https://b")]);
        let map = source.load().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["BASE_URL"], "https://a");
        assert_eq!(map["base_url"], "https://b");
    }

    #[test]
    fn test_prefix_filter() {
        let source = EnvSource::from_vars([("API_TOKEN", "t"), ("HOME", "/root")]).with_prefix("API_");
        let map = source.load().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["API_TOKEN"], "t");
    }

    #[test]
    fn test_process_env_loads() {
        // PATH-like variables are not guaranteed, so only check the call succeeds
        // and that the prefix filter is honoured.
        let source = EnvSource::new().with_prefix("REQTEMPLATE_TEST_NONEXISTENT_");
        let map = source.load().unwrap();
        assert!(map.is_empty());
    }
}
