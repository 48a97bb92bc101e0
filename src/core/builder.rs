//! Builder for constructing PropertyStore instances.

use crate::core::validation::{RequiredKeys, Validate};
use crate::core::{PropertyLoader, PropertyStore};
use crate::error::{Error, Result};
use crate::sources::{
    DEFAULT_FILE_PRIORITY, ENVIRONMENT_FILE_PRIORITY, EnvSource, MapSource, PropertiesFileSource,
    PropertySource,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment label used when nothing selects one.
pub const DEFAULT_ENVIRONMENT: &str = "local";

/// Property consulted to select the environment label.
pub const DEFAULT_ENVIRONMENT_KEY: &str = "environment";

/// Token replaced by the environment label in an environment file pattern.
pub const ENVIRONMENT_TOKEN: &str = "{env}";

/// Which of the two property files wins when both define a key.
///
/// System properties and environment variables always load before either
/// file, so both files overwrite them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precedence {
    /// Environment file first, default file last: the default file wins.
    #[default]
    DefaultFileLast,
    /// Default file first, environment file last: the environment file wins.
    EnvironmentFileLast,
}

impl Precedence {
    fn file_priorities(self) -> (i32, i32) {
        match self {
            Self::DefaultFileLast => (ENVIRONMENT_FILE_PRIORITY, DEFAULT_FILE_PRIORITY),
            Self::EnvironmentFileLast => (DEFAULT_FILE_PRIORITY, ENVIRONMENT_FILE_PRIORITY),
        }
    }
}

/// Builder for constructing a [`PropertyStore`].
///
/// Sources load in this order, each overwriting colliding keys of the ones
/// before it:
///
/// 1. system properties supplied through [`with_property`](Self::with_property)
/// 2. process environment variables
/// 3. the environment-specific properties file
/// 4. the default properties file
///
/// Files 3 and 4 swap places under [`Precedence::EnvironmentFileLast`].
///
/// # Examples
///
/// ```rust,no_run
/// use reqtemplate::prelude::*;
///
/// # fn example() -> Result<()> {
/// // Loads resources/environment/<env>.properties then resources/api.properties
/// let store = PropertyStore::builder()
///     .with_resource_dir("resources")
///     .require("BASE_URL")
///     .build()?;
/// println!("environment: {}", store.environment());
/// # Ok(())
/// # }
/// ```
pub struct PropertyStoreBuilder {
    system: MapSource,
    env_vars: Option<EnvSource>,
    environment: Option<String>,
    environment_key: String,
    environment_file_pattern: Option<String>,
    default_file: Option<PathBuf>,
    precedence: Precedence,
    custom_sources: Vec<Box<dyn PropertySource>>,
    required: RequiredKeys,
    validators: Vec<Box<dyn Validate>>,
}

impl PropertyStoreBuilder {
    /// Create a new builder with default settings.
    ///
    /// By default the process environment is read, the environment label is
    /// selected by the `environment` property and no files are configured.
    pub fn new() -> Self {
        Self {
            system: MapSource::new("system"),
            env_vars: Some(EnvSource::new()),
            environment: None,
            environment_key: DEFAULT_ENVIRONMENT_KEY.to_string(),
            environment_file_pattern: None,
            default_file: None,
            precedence: Precedence::default(),
            custom_sources: Vec::new(),
            required: RequiredKeys::default(),
            validators: Vec::new(),
        }
    }

    /// Add a system-level property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.system = self.system.with_property(key, value);
        self
    }

    /// Add many system-level properties.
    pub fn with_properties<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.system = self.system.with_properties(values);
        self
    }

    /// Enable or disable reading the process environment.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.env_vars = enabled.then(EnvSource::new);
        self
    }

    /// Replace the environment variable source, e.g. with a fixed variable
    /// list or a prefix filter.
    pub fn with_env_source(mut self, source: EnvSource) -> Self {
        self.env_vars = Some(source);
        self
    }

    /// Force the environment label instead of looking it up.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Property consulted to select the environment label.
    ///
    /// Default is `environment`.
    pub fn with_environment_key(mut self, key: impl Into<String>) -> Self {
        self.environment_key = key.into();
        self
    }

    /// Use the conventional resource layout under `dir`:
    /// `<dir>/environment/<env>.properties` and `<dir>/api.properties`.
    pub fn with_resource_dir(self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let pattern = dir
            .join("environment")
            .join(format!("{}.properties", ENVIRONMENT_TOKEN));
        self.with_environment_file_pattern(pattern.to_string_lossy())
            .with_default_file(dir.join("api.properties"))
    }

    /// Path of the environment-specific file, with `{env}` standing for the
    /// environment label.
    pub fn with_environment_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.environment_file_pattern = Some(pattern.into());
        self
    }

    /// Path of the default/common properties file.
    pub fn with_default_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_file = Some(path.into());
        self
    }

    /// Choose which property file wins on collisions.
    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Add a custom property source; its priority places it in the load order.
    pub fn with_source<S: PropertySource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Require `key` to be present once all sources are merged.
    pub fn require(mut self, key: impl Into<String>) -> Self {
        self.required.push(key);
        self
    }

    /// Add a validator that must pass before the store is returned.
    pub fn with_validation<V: Validate + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Load every source and build the store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A configured properties file is missing or unreadable
    /// - Any other source fails to load
    /// - Validation fails
    pub fn build(self) -> Result<PropertyStore> {
        let environment = match self.environment.clone() {
            Some(environment) => environment,
            None => self.select_environment()?,
        };
        info!(environment = %environment, "Fetching config for environment");

        let (environment_priority, default_priority) = self.precedence.file_priorities();

        let mut loader = PropertyLoader::new();
        loader.add_source(Box::new(self.system));
        if let Some(env_vars) = self.env_vars {
            loader.add_source(Box::new(env_vars));
        }
        for source in self.custom_sources {
            loader.add_source(source);
        }
        if let Some(pattern) = &self.environment_file_pattern {
            let path = pattern.replace(ENVIRONMENT_TOKEN, &environment);
            loader.add_source(Box::new(
                PropertiesFileSource::new(path).with_priority(environment_priority),
            ));
        }
        if let Some(path) = self.default_file {
            loader.add_source(Box::new(
                PropertiesFileSource::new(path).with_priority(default_priority),
            ));
        }

        debug!(sources = ?loader.source_names(), "loading properties");
        let merged = loader.load()?;
        let store = PropertyStore::from_parts(merged.values, environment, merged.sources);

        if !self.required.is_empty() {
            self.required.validate(&store)?;
        }
        for validator in &self.validators {
            validator.validate(&store)?;
        }

        info!(
            environment = %store.environment(),
            properties = store.len(),
            "property store ready"
        );
        Ok(store)
    }

    /// Look the environment label up in system properties and environment
    /// variables, the latter winning.
    fn select_environment(&self) -> Result<String> {
        let mut label = self.system.load()?.remove(&self.environment_key);
        if let Some(env_vars) = &self.env_vars {
            if let Some(value) = env_vars.load()?.remove(&self.environment_key) {
                label = Some(value);
            }
        }

        match label {
            Some(label) if !label.trim().is_empty() => Ok(label.trim().to_string()),
            Some(_) => Err(Error::Load(format!(
                "Property '{}' selects an empty environment",
                self.environment_key
            ))),
            None => Ok(DEFAULT_ENVIRONMENT.to_string()),
        }
    }
}

impl Default for PropertyStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn resources(env_file: &str, default_file: &str) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("environment")).unwrap();
        fs::write(temp_dir.path().join("environment/dev.properties"), env_file).unwrap();
        fs::write(temp_dir.path().join("api.properties"), default_file).unwrap();
        temp_dir
    }

    #[test]
    fn test_builder_accumulates_properties() {
        let builder = PropertyStoreBuilder::new()
            .with_property("A", "1")
            .with_properties([("B", "2")]);
        assert_eq!(builder.system.load().unwrap().len(), 2);
    }

    #[test]
    fn test_environment_defaults_to_local() {
        let store = PropertyStoreBuilder::new()
            .with_env_source(EnvSource::from_vars(Vec::<(String, String)>::new()))
            .build()
            .unwrap();
        assert_eq!(store.environment(), DEFAULT_ENVIRONMENT);
    }

    #[test]
    fn test_env_var_overrides_system_selector() {
        let store = PropertyStoreBuilder::new()
            .with_property("environment", "qa")
            .with_env_source(EnvSource::from_vars([("environment", "dev")]))
            .build()
            .unwrap();
        assert_eq!(store.environment(), "dev");
    }

    #[test]
    fn test_custom_environment_key() {
        let store = PropertyStoreBuilder::new()
            .with_env_vars(false)
            .with_environment_key("APP_ENV")
            .with_property("APP_ENV", "staging")
            .build()
            .unwrap();
        assert_eq!(store.environment(), "staging");
    }

    #[test]
    fn test_empty_selector_rejected() {
        let result = PropertyStoreBuilder::new()
            .with_env_vars(false)
            .with_property("environment", "  ")
            .build();
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn test_default_file_wins_by_default() {
        let dir = resources(
            "BASE_URL=https://dev.example.com\n",
            "BASE_URL=https://default.example.com\n",
        );
        let store = PropertyStoreBuilder::new()
            .with_env_vars(false)
            .with_environment("dev")
            .with_resource_dir(dir.path())
            .build()
            .unwrap();
        assert_eq!(store.get("BASE_URL"), Some("https://default.example.com"));
    }

    #[test]
    fn test_environment_file_last() {
        let dir = resources(
            "BASE_URL=https://dev.example.com\n",
            "BASE_URL=https://default.example.com\n",
        );
        let store = PropertyStoreBuilder::new()
            .with_env_vars(false)
            .with_environment("dev")
            .with_resource_dir(dir.path())
            .with_precedence(Precedence::EnvironmentFileLast)
            .build()
            .unwrap();
        assert_eq!(store.get("BASE_URL"), Some("https://dev.example.com"));
    }

    #[test]
    fn test_missing_environment_file_fails() {
        let dir = resources("", "BASE_URL=https://default.example.com\n");
        let result = PropertyStoreBuilder::new()
            .with_env_vars(false)
            .with_environment("prod")
            .with_resource_dir(dir.path())
            .build();
        match result {
            Err(Error::Load(msg)) => assert!(msg.contains("prod.properties")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_required_key_missing_fails() {
        let result = PropertyStoreBuilder::new()
            .with_env_vars(false)
            .with_property("LOGIN_PATH", "/login")
            .require("BASE_URL")
            .build();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_custom_validator_runs() {
        let result = PropertyStoreBuilder::new()
            .with_env_vars(false)
            .with_property("BASE_URL", "http://insecure")
            .with_validation(|store: &PropertyStore| {
                if store.get("BASE_URL").is_some_and(|u| u.starts_with("https://")) {
                    Ok(())
                } else {
                    Err(crate::error::ValidationError::custom("BASE_URL must use https"))
                }
            })
            .build();
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
