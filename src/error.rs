//! Error types for reqtemplate.

use std::fmt;

/// Result type alias for reqtemplate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading properties or resolving templates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required property source could not be loaded.
    ///
    /// Raised while building a [`PropertyStore`](crate::core::PropertyStore);
    /// the store is not usable and the caller should abort startup.
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// The loaded properties failed validation.
    #[error("Configuration validation failed: {0}")]
    Validation(String),

    /// A resolved property key has no value in the store.
    #[error("Property not found for key: {key}")]
    PropertyNotFound {
        /// The key that was looked up
        key: String,
    },

    /// A property value could not be converted into the requested type.
    #[error("Property '{key}' has value '{value}' which could not be parsed: {reason}")]
    PropertyParse {
        /// The key that was looked up
        key: String,
        /// The raw value found in the store
        value: String,
        /// Why the conversion failed
        reason: String,
    },

    /// A template resource does not exist in the template namespace.
    #[error("Resource not found: {name}")]
    ResourceNotFound {
        /// The template resource name that was requested
        name: String,
    },

    /// A template was not valid JSON after substitution, or had the wrong shape.
    #[error("Failed to parse template '{template}': {reason}")]
    TemplateParse {
        /// The template resource name
        template: String,
        /// What went wrong
        reason: String,
    },

    /// Placeholder tokens survived substitution under a rejecting policy.
    #[error("Template '{template}' has unresolved placeholders: {}", placeholders.join(", "))]
    UnresolvedPlaceholders {
        /// The template resource name
        template: String,
        /// Identifiers that had no binding
        placeholders: Vec<String>,
    },

    /// A declared method was used in a way its metadata does not allow.
    #[error("Illegal usage: {0}")]
    IllegalUsage(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a property-not-found error for `key`.
    pub fn property_not_found(key: impl Into<String>) -> Self {
        Self::PropertyNotFound { key: key.into() }
    }

    /// Create a resource-not-found error for `name`.
    pub fn resource_not_found(name: impl Into<String>) -> Self {
        Self::ResourceNotFound { name: name.into() }
    }

    /// Create a template parse error.
    pub fn template_parse(template: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::TemplateParse {
            template: template.into(),
            reason: reason.to_string(),
        }
    }
}

/// Validation error for loaded property sets.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A required key is absent from the merged properties.
    MissingKey(String),

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a missing key error.
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey(key.into())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::MissingKey(key) => write!(f, "Required property '{}' is missing", key),
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err.to_string())
    }
}
