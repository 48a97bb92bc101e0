//! Base request configuration and the final layered request.

use crate::error::Result;
use crate::request::ResolvedRequestSpec;
use crate::request::headers::{self, REDACTED};
use crate::resolver::ConfigResolver;
use serde::Serialize;
use std::collections::BTreeMap;

/// Property holding the base URI.
pub const BASE_URL_KEY: &str = "BASE_URL";
/// Property holding the base API path.
pub const BASE_API_PATH_KEY: &str = "BASE_API_PATH";

/// Settings shared by every request: where to send it and common headers.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::request::{BaseRequest, ResolvedRequestSpec};
///
/// let base = BaseRequest::new("https://api.example.com")
///     .with_base_path("/v1")
///     .with_json_defaults();
/// let spec = base.layer(ResolvedRequestSpec::default());
/// assert_eq!(spec.url(), "https://api.example.com/v1");
/// assert_eq!(spec.headers["Accept"], "application/json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRequest {
    base_uri: String,
    base_path: Option<String>,
    headers: BTreeMap<String, String>,
}

impl BaseRequest {
    /// Create a base request for `base_uri`.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            base_path: None,
            headers: BTreeMap::new(),
        }
    }

    /// Build the base request from configuration: `BASE_URL` is required,
    /// `BASE_API_PATH` is used when present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertyNotFound`](crate::error::Error::PropertyNotFound)
    /// if `BASE_URL` is not configured.
    pub fn from_config(config: &ConfigResolver) -> Result<Self> {
        let base = Self::new(config.get_property(BASE_URL_KEY)?);
        Ok(match config.store().get(BASE_API_PATH_KEY) {
            Some(path) => base.with_base_path(path),
            None => base,
        })
    }

    /// Set the path appended to the base URI.
    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add JSON `Content-Type` and `Accept` headers and the default user agent.
    pub fn with_json_defaults(self) -> Self {
        self.with_header(headers::CONTENT_TYPE, headers::JSON_CONTENT_TYPE)
            .with_header(headers::ACCEPT, headers::JSON_CONTENT_TYPE)
            .with_header(headers::USER_AGENT, headers::DEFAULT_USER_AGENT)
    }

    /// The base URI.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// The base path, if any.
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// Layer a resolved template onto this base.
    ///
    /// Template headers replace base headers of the same name, compared
    /// case-insensitively.
    pub fn layer(&self, resolved: ResolvedRequestSpec) -> RequestSpec {
        let mut headers = self.headers.clone();
        for (name, value) in resolved.headers.unwrap_or_default() {
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
            headers.insert(name, value);
        }

        RequestSpec {
            base_uri: self.base_uri.clone(),
            base_path: self.base_path.clone(),
            headers,
            query_params: resolved.query_params.unwrap_or_default(),
            path_params: resolved.path_params.unwrap_or_default(),
            body: resolved.body,
        }
    }
}

/// A complete request specification, ready for an HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSpec {
    /// Base URI.
    pub base_uri: String,
    /// Path appended to the base URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Header name to value.
    pub headers: BTreeMap<String, String>,
    /// Query parameter name to value.
    pub query_params: BTreeMap<String, String>,
    /// Path parameter name to value.
    pub path_params: BTreeMap<String, String>,
    /// Serialized JSON body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestSpec {
    /// Base URI joined with the base path.
    pub fn url(&self) -> String {
        match self.base_path.as_deref() {
            Some(path) if !path.is_empty() => join(&self.base_uri, path),
            _ => self.base_uri.clone(),
        }
    }

    /// Full URL for `endpoint`, with `{name}` segments replaced by path
    /// parameters. Unknown `{name}` segments are left untouched.
    pub fn url_for(&self, endpoint: &str) -> String {
        let mut path = endpoint.to_string();
        for (name, value) in &self.path_params {
            path = path.replace(&format!("{{{}}}", name), value);
        }
        join(&self.url(), &path)
    }

    /// Headers with sensitive values masked, for logging.
    pub fn redacted_headers(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(name, value)| {
                let shown = if headers::is_sensitive(name) {
                    REDACTED.to_string()
                } else {
                    value.clone()
                };
                (name.clone(), shown)
            })
            .collect()
    }
}

fn join(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
