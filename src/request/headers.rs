//! Header names and values shared by every request.

/// `Authorization` header name; its value is masked in logs.
pub const AUTHORIZATION: &str = "Authorization";
/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Accept` header name.
pub const ACCEPT: &str = "Accept";
/// `User-Agent` header name.
pub const USER_AGENT: &str = "User-Agent";

/// JSON media type.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// User agent sent by default.
pub const DEFAULT_USER_AGENT: &str = "reqtemplate";

/// Replacement shown instead of a sensitive header value.
pub const REDACTED: &str = "[REDACTED]";

/// Header names whose values never appear in logs.
pub const SENSITIVE: &[&str] = &[AUTHORIZATION];

/// Whether `name` is a sensitive header (case-insensitive).
pub fn is_sensitive(name: &str) -> bool {
    SENSITIVE.iter().any(|s| s.eq_ignore_ascii_case(name))
}
