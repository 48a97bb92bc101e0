//! # reqtemplate
//!
//! Declarative configuration and request-template resolution for API test suites.
//!
//! ## Overview
//!
//! `reqtemplate` turns small pieces of per-method metadata into concrete values:
//! - Layered properties (system properties → env vars → environment file → default file)
//!   loaded once into an immutable [`PropertyStore`](core::PropertyStore)
//! - Configuration interfaces whose methods resolve to property values
//! - Request factories whose methods load a JSON template, substitute `{{placeholder}}`
//!   tokens with call arguments and split the result into headers, body, query and
//!   path parameters
//!
//! Declared interfaces are plain dispatch tables built once at startup; there is no
//! global state, so tests can build isolated stores side by side.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reqtemplate::prelude::*;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<()> {
//! // resources/environment/<env>.properties, then resources/api.properties
//! let store = PropertyStore::builder()
//!     .with_resource_dir("resources")
//!     .require("BASE_URL")
//!     .build()?;
//!
//! let config = ConfigResolver::new(Arc::new(store), Arc::new(ConfigInterface::standard()));
//! let base = BaseRequest::from_config(&config)?.with_json_defaults();
//!
//! let requests = RequestFactory::builder("AppRequests")
//!     .method("loginRequest", "requests/login.json", ["username", "password"])
//!     .build()?;
//! let resolver = RequestFactoryResolver::new(
//!     Arc::new(requests),
//!     Arc::new(DirTemplateLoader::new("resources")),
//! );
//!
//! let spec = resolver.invoke(&base, "loginRequest", &["alice".into(), "Pass@123".into()])?;
//! println!("POST {}{} {:?}", spec.url(), config.invoke("getLoginPath", &[])?, spec.body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Open behaviours
//!
//! Two behaviours are kept as observed in existing suites and made switchable:
//! - The default properties file loads after the environment file and wins
//!   collisions; see [`Precedence`](core::Precedence).
//! - Placeholders without a binding pass through verbatim; see
//!   [`PlaceholderPolicy`](template::PlaceholderPolicy).

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod request;
pub mod resolver;
pub mod sources;
pub mod template;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        Precedence, PropertyStore, PropertyStoreBuilder, SharedPropertyStore, Validate,
    };
    pub use crate::error::{Error, Result, ValidationError};
    pub use crate::request::{BaseRequest, RequestSpec, ResolvedRequestSpec};
    pub use crate::resolver::{
        Argument, ConfigInterface, ConfigResolver, RequestFactory, RequestFactoryResolver,
    };
    pub use crate::template::{
        Bindings, DirTemplateLoader, MemoryTemplateLoader, PlaceholderPolicy,
        TemplateLoader, TemplateMaterializer,
    };
}
