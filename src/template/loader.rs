//! Template resource loading.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Reads named template resources from a template namespace.
///
/// Names are relative paths such as `requests/login.json`. Loaders perform no
/// transformation and no caching: every call reads the resource afresh.
pub trait TemplateLoader: Send + Sync {
    /// Return the full text of the template `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceNotFound`] if no such template exists.
    fn load(&self, name: &str) -> Result<String>;
}

/// Loads templates from files below a root directory.
///
/// # Examples
///
/// ```rust,no_run
/// use reqtemplate::template::{DirTemplateLoader, TemplateLoader};
///
/// # fn example() -> reqtemplate::error::Result<()> {
/// let loader = DirTemplateLoader::new("resources");
/// let text = loader.load("requests/login.json")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirTemplateLoader {
    root: PathBuf,
}

impl DirTemplateLoader {
    /// Create a loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The namespace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a resource name to a path, refusing names that escape the root.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let contained = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        if !contained {
            return Err(Error::resource_not_found(name));
        }

        Ok(self.root.join(relative))
    }
}

impl TemplateLoader for DirTemplateLoader {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;
        debug!(template = name, path = %path.display(), "loading template");

        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::resource_not_found(name)),
            // A directory where a file was expected is just as missing.
            Err(_) if path.is_dir() => Err(Error::resource_not_found(name)),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Serves templates from memory, e.g. ones embedded with `include_str!`.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::template::{MemoryTemplateLoader, TemplateLoader};
///
/// let loader = MemoryTemplateLoader::new()
///     .with_template("requests/ping.json", r#"{"queryParams":{"q":"{{q}}"}}"#);
/// assert!(loader.load("requests/ping.json").is_ok());
/// assert!(loader.load("requests/missing.json").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateLoader {
    templates: HashMap<String, String>,
}

impl MemoryTemplateLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under `name`.
    pub fn with_template(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.insert(name.into(), text.into());
        self
    }
}

impl TemplateLoader for MemoryTemplateLoader {
    fn load(&self, name: &str) -> Result<String> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| Error::resource_not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("requests")).unwrap();
        fs::write(
            temp_dir.path().join("requests/login.json"),
            r#"{"body":{"u":"{{username}}"}}"#,
        )
        .unwrap();

        let loader = DirTemplateLoader::new(temp_dir.path());
        let text = loader.load("requests/login.json").unwrap();
        assert_eq!(text, r#"{"body":{"u":"{{username}}"}}"#);
    }

    #[test]
    fn test_missing_resource() {
        let temp_dir = TempDir::new().unwrap();
        let loader = DirTemplateLoader::new(temp_dir.path());

        match loader.load("requests/nope.json") {
            Err(Error::ResourceNotFound { name }) => assert_eq!(name, "requests/nope.json"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_not_a_resource() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("requests")).unwrap();
        let loader = DirTemplateLoader::new(temp_dir.path());

        assert!(matches!(
            loader.load("requests"),
            Err(Error::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn test_names_cannot_escape_root() {
        let loader = DirTemplateLoader::new("/srv/templates");
        for name in ["../secret.json", "requests/../../x.json", "/etc/passwd", ""] {
            assert!(
                matches!(loader.load(name), Err(Error::ResourceNotFound { .. })),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemoryTemplateLoader::new().with_template("a.json", "{}");
        assert_eq!(loader.load("a.json").unwrap(), "{}");
        assert!(matches!(
            loader.load("b.json"),
            Err(Error::ResourceNotFound { .. })
        ));
    }
}
