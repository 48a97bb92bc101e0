//! Request specifications produced by template resolution.

mod base;
pub mod headers;
mod spec;

pub use base::{BASE_API_PATH_KEY, BASE_URL_KEY, BaseRequest, RequestSpec};
pub use spec::ResolvedRequestSpec;
