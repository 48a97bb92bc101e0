//! JSON request templates: loading and placeholder materialization.

mod loader;
mod materializer;

pub use loader::{DirTemplateLoader, MemoryTemplateLoader, TemplateLoader};
pub use materializer::{Bindings, PlaceholderPolicy, TemplateMaterializer};
