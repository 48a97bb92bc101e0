//! Placeholder substitution and request-section extraction.

use crate::error::{Error, Result};
use crate::request::ResolvedRequestSpec;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Name to value associations filling one template's placeholders.
pub type Bindings = Map<String, Value>;

/// A placeholder that is the whole content of a JSON string literal.
static QUOTED_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""\{\{([^"{}]+)\}\}""#).expect("valid placeholder regex"));

/// A placeholder anywhere in the text.
static ANY_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{\{([^"{}]+)\}\}"#).expect("valid placeholder regex"));

/// What to do with placeholders that have no binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderPolicy {
    /// Leave the literal `{{name}}` token in the output and log a warning.
    #[default]
    PassThrough,
    /// Fail with [`Error::UnresolvedPlaceholders`].
    Reject,
}

/// Turns template text plus bindings into a [`ResolvedRequestSpec`].
///
/// Materialization has two phases. First every `"{{name}}"` token (a
/// placeholder forming the entire content of a JSON string literal) whose
/// name is bound is replaced by the JSON serialization of the bound value, so
/// a string stays quoted while a number or object is spliced in bare. The
/// result is then parsed and split into its `headers`, `body`, `queryParams`
/// and `pathParams` sections.
///
/// Substitution is a single pass over the template, so text inside a bound
/// value is never treated as a placeholder itself.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::template::{Bindings, TemplateMaterializer};
/// use serde_json::json;
///
/// let template = r#"{"body":{"user":"{{username}}","age":"{{age}}"}}"#;
/// let mut bindings = Bindings::new();
/// bindings.insert("username".into(), json!("alice"));
/// bindings.insert("age".into(), json!(30));
///
/// let spec = TemplateMaterializer::new()
///     .materialize("requests/user.json", template, &bindings)
///     .unwrap();
/// assert_eq!(spec.body.as_deref(), Some(r#"{"user":"alice","age":30}"#));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateMaterializer {
    policy: PlaceholderPolicy,
}

impl TemplateMaterializer {
    /// Create a materializer that passes unresolved placeholders through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unresolved-placeholder policy.
    pub fn with_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The unresolved-placeholder policy in effect.
    pub fn policy(&self) -> PlaceholderPolicy {
        self.policy
    }

    /// Substitute bound placeholders in `text`.
    ///
    /// `template` names the resource for error reporting only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedPlaceholders`] under
    /// [`PlaceholderPolicy::Reject`] when any placeholder survives.
    pub fn substitute(&self, template: &str, text: &str, bindings: &Bindings) -> Result<String> {
        let mut unresolved: Vec<String> = Vec::new();

        let substituted = QUOTED_PLACEHOLDER.replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            match bindings.get(name) {
                Some(value) => value.to_string(),
                None => {
                    push_unique(&mut unresolved, name);
                    caps[0].to_string()
                }
            }
        });

        // Placeholders embedded in longer strings are never substituted.
        for caps in ANY_PLACEHOLDER.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if !is_quoted(text, whole.start(), whole.end()) {
                push_unique(&mut unresolved, &caps[1]);
            }
        }

        if !unresolved.is_empty() {
            match self.policy {
                PlaceholderPolicy::PassThrough => {
                    warn!(
                        template,
                        placeholders = ?unresolved,
                        "unresolved placeholders left in template"
                    );
                }
                PlaceholderPolicy::Reject => {
                    return Err(Error::UnresolvedPlaceholders {
                        template: template.to_string(),
                        placeholders: unresolved,
                    });
                }
            }
        }

        Ok(substituted.into_owned())
    }

    /// Substitute, parse and split a template into a request spec.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Placeholders remain and the policy is [`PlaceholderPolicy::Reject`]
    /// - The substituted text is not valid JSON
    /// - The root is not an object, or `headers`, `queryParams` or
    ///   `pathParams` is present but not an object
    pub fn materialize(
        &self,
        template: &str,
        text: &str,
        bindings: &Bindings,
    ) -> Result<ResolvedRequestSpec> {
        debug!(template, bindings = bindings.len(), "materializing request template");

        let substituted = self.substitute(template, text, bindings)?;
        let root: Value =
            serde_json::from_str(&substituted).map_err(|e| Error::template_parse(template, e))?;

        let Value::Object(mut root) = root else {
            return Err(Error::template_parse(
                template,
                "template root must be a JSON object",
            ));
        };

        let body = match root.remove("body") {
            None | Some(Value::Null) => None,
            Some(body) => Some(body.to_string()),
        };

        Ok(ResolvedRequestSpec {
            headers: string_map(template, "headers", root.remove("headers"))?,
            query_params: string_map(template, "queryParams", root.remove("queryParams"))?,
            path_params: string_map(template, "pathParams", root.remove("pathParams"))?,
            body,
        })
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

fn is_quoted(text: &str, start: usize, end: usize) -> bool {
    text[..start].ends_with('"') && text[end..].starts_with('"')
}

/// Convert an optional section into a name to string map. Absent, `null` and
/// empty sections all yield `None`.
fn string_map(
    template: &str,
    section: &str,
    value: Option<Value>,
) -> Result<Option<BTreeMap<String, String>>> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(entries)) => entries,
        Some(other) => {
            return Err(Error::template_parse(
                template,
                format!(
                    "section '{}' must be a JSON object, found {}",
                    section,
                    type_name(&other)
                ),
            ));
        }
    };

    if entries.is_empty() {
        return Ok(None);
    }

    Ok(Some(
        entries
            .into_iter()
            .map(|(name, value)| (name, value_to_string(value)))
            .collect(),
    ))
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bindings(value: Value) -> Bindings {
        match value {
            Value::Object(map) => map,
            _ => panic!("bindings must be an object"),
        }
    }

    #[test]
    fn test_login_round_trip() {
        let template = r#"{"body":{"user":"{{username}}","pass":"{{password}}"}}"#;
        let spec = TemplateMaterializer::new()
            .materialize(
                "login.json",
                template,
                &bindings(json!({"username": "alice", "password": "secret"})),
            )
            .unwrap();

        assert_eq!(spec.body.as_deref(), Some(r#"{"user":"alice","pass":"secret"}"#));
        assert!(spec.headers.is_none());
        assert!(spec.query_params.is_none());
        assert!(spec.path_params.is_none());
    }

    #[test]
    fn test_type_aware_substitution() {
        let template = r#"{"body":{"n":"{{n}}","flag":"{{flag}}","tags":"{{tags}}","nothing":"{{nothing}}"}}"#;
        let spec = TemplateMaterializer::new()
            .materialize(
                "t.json",
                template,
                &bindings(json!({"n": 5, "flag": true, "tags": ["a", "b"], "nothing": null})),
            )
            .unwrap();

        assert_eq!(
            spec.body_json().unwrap().unwrap(),
            json!({"n": 5, "flag": true, "tags": ["a", "b"], "nothing": null})
        );
    }

    #[test]
    fn test_strings_are_escaped() {
        let template = r#"{"body":{"q":"{{q}}"}}"#;
        let spec = TemplateMaterializer::new()
            .materialize("t.json", template, &bindings(json!({"q": "say \"hi\"\n"})))
            .unwrap();
        assert_eq!(spec.body_json().unwrap().unwrap(), json!({"q": "say \"hi\"\n"}));
    }

    #[test]
    fn test_bound_value_is_not_rescanned() {
        let template = r#"{"body":{"a":"{{a}}","b":"{{b}}"}}"#;
        let spec = TemplateMaterializer::new()
            .materialize("t.json", template, &bindings(json!({"a": "{{b}}", "b": "x"})))
            .unwrap();
        assert_eq!(spec.body_json().unwrap().unwrap(), json!({"a": "{{b}}", "b": "x"}));
    }

    #[test]
    fn test_same_placeholder_twice() {
        let template = r#"{"headers":{"X-User":"{{user}}"},"body":{"user":"{{user}}"}}"#;
        let spec = TemplateMaterializer::new()
            .materialize("t.json", template, &bindings(json!({"user": "bob"})))
            .unwrap();
        assert_eq!(spec.headers.unwrap()["X-User"], "bob");
        assert_eq!(spec.body.as_deref(), Some(r#"{"user":"bob"}"#));
    }

    #[test]
    fn test_sections_become_string_maps() {
        let template = r#"{
            "headers": {"Authorization": "Bearer x", "X-Retry": 3},
            "queryParams": {"page": "{{page}}", "active": true},
            "pathParams": {"id": "{{id}}"}
        }"#;
        let spec = TemplateMaterializer::new()
            .materialize("t.json", template, &bindings(json!({"page": 2, "id": "u-1"})))
            .unwrap();

        let headers = spec.headers.unwrap();
        assert_eq!(headers["Authorization"], "Bearer x");
        assert_eq!(headers["X-Retry"], "3");
        let query = spec.query_params.unwrap();
        assert_eq!(query["page"], "2");
        assert_eq!(query["active"], "true");
        assert_eq!(spec.path_params.unwrap()["id"], "u-1");
        assert!(spec.body.is_none());
    }

    #[test]
    fn test_empty_and_null_sections_are_omitted() {
        let template = r#"{"headers":{},"queryParams":null,"body":null}"#;
        let spec = TemplateMaterializer::new()
            .materialize("t.json", template, &Bindings::new())
            .unwrap();
        assert_eq!(spec, ResolvedRequestSpec::default());
    }

    #[test]
    fn test_empty_body_object_is_kept() {
        let spec = TemplateMaterializer::new()
            .materialize("t.json", r#"{"body":{}}"#, &Bindings::new())
            .unwrap();
        assert_eq!(spec.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_missing_binding_passes_through() {
        let template = r#"{"body":{"u":"{{username}}","p":"{{password}}"}}"#;
        let spec = TemplateMaterializer::new()
            .materialize("t.json", template, &bindings(json!({"username": "bob"})))
            .unwrap();
        assert_eq!(spec.body.as_deref(), Some(r#"{"u":"bob","p":"{{password}}"}"#));
    }

    #[test]
    fn test_missing_binding_rejected() {
        let template = r#"{"headers":{"Authorization":"Bearer {{token}}"},"body":{"p":"{{password}}"}}"#;
        let err = TemplateMaterializer::new()
            .with_policy(PlaceholderPolicy::Reject)
            .materialize("requests/login.json", template, &Bindings::new())
            .unwrap_err();

        match err {
            Error::UnresolvedPlaceholders {
                template,
                placeholders,
            } => {
                assert_eq!(template, "requests/login.json");
                assert_eq!(placeholders, vec!["password", "token"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_reject_accepts_fully_bound_template() {
        let template = r#"{"body":{"p":"{{password}}"}}"#;
        let spec = TemplateMaterializer::new()
            .with_policy(PlaceholderPolicy::Reject)
            .materialize("t.json", template, &bindings(json!({"password": "pw"})))
            .unwrap();
        assert_eq!(spec.body.as_deref(), Some(r#"{"p":"pw"}"#));
    }

    #[test]
    fn test_malformed_json() {
        let err = TemplateMaterializer::new()
            .materialize("requests/broken.json", r#"{"body": {"#, &Bindings::new())
            .unwrap_err();
        match err {
            Error::TemplateParse { template, .. } => assert_eq!(template, "requests/broken.json"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_object_root_and_sections() {
        let materializer = TemplateMaterializer::new();
        assert!(matches!(
            materializer.materialize("t.json", "[1,2]", &Bindings::new()),
            Err(Error::TemplateParse { .. })
        ));
        assert!(matches!(
            materializer.materialize("t.json", r#"{"headers":["a"]}"#, &Bindings::new()),
            Err(Error::TemplateParse { .. })
        ));
    }

    #[test]
    fn test_unquoted_placeholder_breaks_json() {
        // Placeholders must be the whole string literal; a bare one is not JSON.
        let err = TemplateMaterializer::new()
            .materialize("t.json", r#"{"body":{"n":{{n}}}}"#, &bindings(json!({"n": 1})))
            .unwrap_err();
        assert!(matches!(err, Error::TemplateParse { .. }));
    }
}
