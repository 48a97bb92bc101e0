//! Configuration interface resolution.

use crate::core::PropertyStore;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// How a configuration method finds its property key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigMethod {
    /// Generic lookup: the single call argument is the key.
    Lookup,
    /// The key declared for this method.
    Property(String),
    /// The method name upper-cased, with no separators inserted
    /// (`getTimeoutMs` reads `GETTIMEOUTMS`).
    Derived,
}

/// A declared configuration interface: method name to [`ConfigMethod`].
///
/// # Examples
///
/// ```rust
/// use reqtemplate::resolver::{ConfigInterface, ConfigMethod};
///
/// let interface = ConfigInterface::builder("ServiceConfig")
///     .lookup("getProperty")
///     .property("getBaseUrl", "BASE_URL")
///     .derived("timeoutms")
///     .build()
///     .unwrap();
/// assert_eq!(
///     interface.method("getBaseUrl"),
///     Some(&ConfigMethod::Property("BASE_URL".to_string()))
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigInterface {
    name: String,
    methods: HashMap<String, ConfigMethod>,
}

impl ConfigInterface {
    /// Start declaring an interface called `name`.
    pub fn builder(name: impl Into<String>) -> ConfigInterfaceBuilder {
        ConfigInterfaceBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// The stock API-test configuration interface.
    ///
    /// | method                | key             |
    /// |-----------------------|-----------------|
    /// | `getProperty(key)`    | the argument    |
    /// | `getBaseUrl`          | `BASE_URL`      |
    /// | `getBaseApiPath`      | `BASE_API_PATH` |
    /// | `getRegistrationPath` | `REGISTER_PATH` |
    /// | `getLoginPath`        | `LOGIN_PATH`    |
    /// | `getLogoutPath`       | `LOGOUT_PATH`   |
    pub fn standard() -> Self {
        let methods = [
            ("getProperty", ConfigMethod::Lookup),
            ("getBaseUrl", ConfigMethod::Property("BASE_URL".to_string())),
            ("getBaseApiPath", ConfigMethod::Property("BASE_API_PATH".to_string())),
            ("getRegistrationPath", ConfigMethod::Property("REGISTER_PATH".to_string())),
            ("getLoginPath", ConfigMethod::Property("LOGIN_PATH".to_string())),
            ("getLogoutPath", ConfigMethod::Property("LOGOUT_PATH".to_string())),
        ];

        Self {
            name: "ConfigFactory".to_string(),
            methods: methods
                .into_iter()
                .map(|(name, method)| (name.to_string(), method))
                .collect(),
        }
    }

    /// The interface name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Metadata declared for `method`.
    pub fn method(&self, method: &str) -> Option<&ConfigMethod> {
        self.methods.get(method)
    }

    /// All declared method names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Builder for a [`ConfigInterface`].
pub struct ConfigInterfaceBuilder {
    name: String,
    methods: Vec<(String, ConfigMethod)>,
}

impl ConfigInterfaceBuilder {
    /// Declare the generic get-property-by-key method.
    pub fn lookup(self, method: impl Into<String>) -> Self {
        self.declare(method, ConfigMethod::Lookup)
    }

    /// Declare a method reading the property `key`.
    pub fn property(self, method: impl Into<String>, key: impl Into<String>) -> Self {
        self.declare(method, ConfigMethod::Property(key.into()))
    }

    /// Declare a method without metadata; its key is its upper-cased name.
    pub fn derived(self, method: impl Into<String>) -> Self {
        self.declare(method, ConfigMethod::Derived)
    }

    /// Declare a method with explicit metadata.
    pub fn declare(mut self, method: impl Into<String>, metadata: ConfigMethod) -> Self {
        self.methods.push((method.into(), metadata));
        self
    }

    /// Finish the dispatch table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalUsage`] if a method name is declared twice.
    pub fn build(self) -> Result<ConfigInterface> {
        let mut methods = HashMap::with_capacity(self.methods.len());
        for (name, metadata) in self.methods {
            if methods.contains_key(&name) {
                return Err(Error::IllegalUsage(format!(
                    "method '{}' declared twice on {}",
                    name, self.name
                )));
            }
            methods.insert(name, metadata);
        }

        Ok(ConfigInterface {
            name: self.name,
            methods,
        })
    }
}

/// Resolves configuration interface calls against a shared [`PropertyStore`].
///
/// Cloning is cheap; clones share the store and the dispatch table.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::core::PropertyStore;
/// use reqtemplate::resolver::{ConfigInterface, ConfigResolver};
/// use std::sync::Arc;
///
/// let store = PropertyStore::from_map("dev", [("BASE_URL", "https://dev.example.com")]);
/// let config = ConfigResolver::new(Arc::new(store), Arc::new(ConfigInterface::standard()));
///
/// assert_eq!(config.invoke("getBaseUrl", &[]).unwrap(), "https://dev.example.com");
/// assert_eq!(config.invoke("getProperty", &["BASE_URL"]).unwrap(), "https://dev.example.com");
/// assert!(config.invoke("getLoginPath", &[]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    store: Arc<PropertyStore>,
    interface: Arc<ConfigInterface>,
}

impl ConfigResolver {
    /// Create a resolver for `interface` reading from `store`.
    pub fn new(store: Arc<PropertyStore>, interface: Arc<ConfigInterface>) -> Self {
        Self { store, interface }
    }

    /// The backing store.
    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// The dispatch table.
    pub fn interface(&self) -> &ConfigInterface {
        &self.interface
    }

    /// Work out which property key a call to `method` reads.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalUsage`] if the method is not declared, or is
    /// called with the wrong number of arguments.
    pub fn resolve_key(&self, method: &str, args: &[&str]) -> Result<String> {
        let metadata = self.interface.method(method).ok_or_else(|| {
            Error::IllegalUsage(format!(
                "method '{}' is not declared on {}",
                method,
                self.interface.name()
            ))
        })?;

        match (metadata, args) {
            (ConfigMethod::Lookup, [key]) => Ok((*key).to_string()),
            (ConfigMethod::Lookup, _) => Err(Error::IllegalUsage(format!(
                "'{}' takes exactly one key argument, got {}",
                method,
                args.len()
            ))),
            (_, [_, ..]) => Err(Error::IllegalUsage(format!(
                "'{}' takes no arguments, got {}",
                method,
                args.len()
            ))),
            (ConfigMethod::Property(key), []) => Ok(key.clone()),
            (ConfigMethod::Derived, []) => Ok(method.to_uppercase()),
        }
    }

    /// Resolve a call to `method` into its property value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalUsage`] for a bad call and
    /// [`Error::PropertyNotFound`] if the resolved key has no value.
    pub fn invoke(&self, method: &str, args: &[&str]) -> Result<String> {
        let key = self.resolve_key(method, args)?;
        debug!(method, key = %key, "resolving configuration property");
        self.store.require(&key).map(str::to_string)
    }

    /// Resolve a call and parse the value into `T`.
    ///
    /// # Errors
    ///
    /// As [`invoke`](Self::invoke), plus [`Error::PropertyParse`] if the value
    /// does not parse.
    pub fn invoke_parsed<T>(&self, method: &str, args: &[&str]) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let key = self.resolve_key(method, args)?;
        let value = self.store.require(&key)?;
        value.parse().map_err(|e: T::Err| Error::PropertyParse {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        })
    }

    /// Read `key` directly, bypassing the dispatch table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertyNotFound`] if the key has no value.
    pub fn get_property(&self, key: &str) -> Result<String> {
        self.store.require(key).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(values: &[(&str, &str)]) -> ConfigResolver {
        let interface = ConfigInterface::builder("TestConfig")
            .lookup("getProperty")
            .property("getBaseUrl", "BASE_URL")
            .derived("getTimeoutMs")
            .build()
            .unwrap();
        let store = PropertyStore::from_map("test", values.iter().copied());
        ConfigResolver::new(Arc::new(store), Arc::new(interface))
    }

    #[test]
    fn test_declared_key() {
        let config = resolver(&[("BASE_URL", "https://a")]);
        assert_eq!(config.invoke("getBaseUrl", &[]).unwrap(), "https://a");
    }

    #[test]
    fn test_generic_lookup_uses_argument() {
        let config = resolver(&[("ANY_KEY", "v")]);
        assert_eq!(config.invoke("getProperty", &["ANY_KEY"]).unwrap(), "v");
    }

    #[test]
    fn test_derived_key_is_plain_uppercase() {
        let config = resolver(&[("GETTIMEOUTMS", "500")]);
        assert_eq!(config.resolve_key("getTimeoutMs", &[]).unwrap(), "GETTIMEOUTMS");
        assert_eq!(config.invoke("getTimeoutMs", &[]).unwrap(), "500");

        // No separator insertion.
        let config = resolver(&[("GET_TIMEOUT_MS", "500")]);
        assert!(config.invoke("getTimeoutMs", &[]).is_err());
    }

    #[test]
    fn test_missing_property_names_key() {
        let config = resolver(&[]);
        match config.invoke("getBaseUrl", &[]) {
            Err(Error::PropertyNotFound { key }) => assert_eq!(key, "BASE_URL"),
            other => panic!("unexpected result: {:?}", other),
        }
        match config.invoke("getProperty", &["NOPE"]) {
            Err(Error::PropertyNotFound { key }) => assert_eq!(key, "NOPE"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_key_lookup_is_case_sensitive() {
        let config = resolver(&[("base_url", "https://lower")]);
        assert!(config.invoke("getBaseUrl", &[]).is_err());
    }

    #[test]
    fn test_illegal_calls() {
        let config = resolver(&[("BASE_URL", "https://a")]);
        assert!(matches!(config.invoke("getNothing", &[]), Err(Error::IllegalUsage(_))));
        assert!(matches!(config.invoke("getProperty", &[]), Err(Error::IllegalUsage(_))));
        assert!(matches!(
            config.invoke("getProperty", &["A", "B"]),
            Err(Error::IllegalUsage(_))
        ));
        assert!(matches!(
            config.invoke("getBaseUrl", &["extra"]),
            Err(Error::IllegalUsage(_))
        ));
    }

    #[test]
    fn test_invoke_parsed() {
        let config = resolver(&[("GETTIMEOUTMS", "500"), ("BAD", "abc")]);
        let timeout: u64 = config.invoke_parsed("getTimeoutMs", &[]).unwrap();
        assert_eq!(timeout, 500);

        match config.invoke_parsed::<u64>("getProperty", &["BAD"]) {
            Err(Error::PropertyParse { key, value, .. }) => {
                assert_eq!(key, "BAD");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let result = ConfigInterface::builder("Dup")
            .derived("getX")
            .property("getX", "X")
            .build();
        assert!(matches!(result, Err(Error::IllegalUsage(_))));
    }

    #[test]
    fn test_standard_interface() {
        let interface = ConfigInterface::standard();
        assert_eq!(interface.name(), "ConfigFactory");
        assert_eq!(interface.method("getProperty"), Some(&ConfigMethod::Lookup));
        assert_eq!(
            interface.method("getRegistrationPath"),
            Some(&ConfigMethod::Property("REGISTER_PATH".to_string()))
        );
        assert_eq!(interface.method_names().len(), 6);
    }
}
