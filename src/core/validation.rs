//! Property store validation support.

use crate::core::PropertyStore;
use crate::error::ValidationError;

/// Trait for validating a freshly loaded property store.
///
/// Validators run once, right after the sources are merged. A failing
/// validator aborts the build, so a misconfigured environment is caught at
/// startup instead of at the first property lookup.
///
/// Closures taking `&PropertyStore` implement this trait.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::core::{PropertyStore, Validate};
/// use reqtemplate::error::ValidationError;
///
/// let https_only = |store: &PropertyStore| match store.get("BASE_URL") {
///     Some(url) if !url.starts_with("https://") => {
///         Err(ValidationError::custom("BASE_URL must use https"))
///     }
///     _ => Ok(()),
/// };
///
/// let store = PropertyStore::from_map("dev", [("BASE_URL", "http://insecure")]);
/// assert!(https_only.validate(&store).is_err());
/// ```
pub trait Validate: Send + Sync {
    /// Validate the store.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` describing what validation failed.
    fn validate(&self, store: &PropertyStore) -> Result<(), ValidationError>;
}

impl<F> Validate for F
where
    F: Fn(&PropertyStore) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, store: &PropertyStore) -> Result<(), ValidationError> {
        self(store)
    }
}

/// Requires a non-empty store containing every listed key.
#[derive(Debug, Clone, Default)]
pub struct RequiredKeys {
    keys: Vec<String>,
}

impl RequiredKeys {
    /// Require the given keys.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Add one more required key.
    pub fn push(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
    }

    /// Whether no keys are required.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Validate for RequiredKeys {
    fn validate(&self, store: &PropertyStore) -> Result<(), ValidationError> {
        if store.is_empty() {
            return Err(ValidationError::custom(
                "Configuration is empty or missing required properties",
            ));
        }

        let mut missing: Vec<ValidationError> = self
            .keys
            .iter()
            .filter(|key| !store.contains_key(key))
            .map(ValidationError::missing_key)
            .collect();

        match missing.len() {
            0 => Ok(()),
            1 => Err(missing.remove(0)),
            _ => Err(ValidationError::Multiple(missing)),
        }
    }
}
