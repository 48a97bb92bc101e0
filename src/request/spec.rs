//! The materialized request template.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The structural pieces of a request, as materialized from a template.
///
/// Every section is optional: a section the template leaves out, sets to
/// `null` or leaves empty is `None` rather than an empty map. The value is
/// owned by the caller that asked for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRequestSpec {
    /// Header name to value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// Query parameter name to value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<BTreeMap<String, String>>,

    /// Path parameter name to value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_params: Option<BTreeMap<String, String>>,

    /// Serialized JSON body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ResolvedRequestSpec {
    /// Parse the body back into a JSON value.
    ///
    /// Returns `None` when the spec has no body.
    pub fn body_json(&self) -> Option<serde_json::Result<Value>> {
        self.body.as_deref().map(serde_json::from_str)
    }

    /// Whether no section is present.
    pub fn is_empty(&self) -> bool {
        self.headers.is_none()
            && self.query_params.is_none()
            && self.path_params.is_none()
            && self.body.is_none()
    }
}
