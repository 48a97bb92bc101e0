//! Request-factory interface resolution.

use crate::error::{Error, Result};
use crate::request::{BaseRequest, RequestSpec, ResolvedRequestSpec};
use crate::template::{Bindings, TemplateLoader, TemplateMaterializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Metadata of one request-factory method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMethod {
    template: Option<String>,
    params: Vec<String>,
}

impl RequestMethod {
    /// A method backed by the template resource `template`.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            params: Vec::new(),
        }
    }

    /// A method declared without a template. Calling it is illegal usage.
    pub fn untagged() -> Self {
        Self {
            template: None,
            params: Vec::new(),
        }
    }

    /// Name the positional parameters, in call order.
    pub fn with_params<I, P>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// The template resource name.
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// The positional parameter names.
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// A declared request-factory interface: method name to [`RequestMethod`].
#[derive(Debug, Clone, Default)]
pub struct RequestFactory {
    name: String,
    methods: HashMap<String, RequestMethod>,
}

impl RequestFactory {
    /// Start declaring a factory called `name`.
    pub fn builder(name: impl Into<String>) -> RequestFactoryBuilder {
        RequestFactoryBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// The factory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Metadata declared for `method`.
    pub fn method(&self, method: &str) -> Option<&RequestMethod> {
        self.methods.get(method)
    }
}

/// Builder for a [`RequestFactory`].
pub struct RequestFactoryBuilder {
    name: String,
    methods: Vec<(String, RequestMethod)>,
}

impl RequestFactoryBuilder {
    /// Declare `method`, backed by `template`, taking `params` positionally.
    pub fn method<I, P>(self, method: impl Into<String>, template: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.declare(method, RequestMethod::new(template).with_params(params))
    }

    /// Declare a method with explicit metadata.
    pub fn declare(mut self, method: impl Into<String>, metadata: RequestMethod) -> Self {
        self.methods.push((method.into(), metadata));
        self
    }

    /// Finish the dispatch table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalUsage`] if a method name is declared twice.
    pub fn build(self) -> Result<RequestFactory> {
        let mut methods = HashMap::with_capacity(self.methods.len());
        for (name, metadata) in self.methods {
            if methods.contains_key(&name) {
                return Err(Error::IllegalUsage(format!(
                    "method '{}' declared twice on {}",
                    name, self.name
                )));
            }
            methods.insert(name, metadata);
        }

        Ok(RequestFactory {
            name: self.name,
            methods,
        })
    }
}

/// A call-time argument to a request-factory method.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A positional value, bound under its parameter name as a string.
    Scalar(String),
    /// A bag of substitution values merged into the bindings as-is.
    Map(Bindings),
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for Argument {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

macro_rules! scalar_argument {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_argument!(bool, char, i32, i64, u32, u64, usize, f64);

impl From<Bindings> for Argument {
    fn from(value: Bindings) -> Self {
        Self::Map(value)
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for Argument {
    fn from(value: HashMap<String, V>) -> Self {
        Self::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Argument {
    fn from(value: BTreeMap<String, V>) -> Self {
        Self::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// Resolves request-factory calls into request specifications.
///
/// Every call loads its template afresh, binds the call arguments, and hands
/// both to the [`TemplateMaterializer`]. The resolver holds no mutable state
/// and may be shared across threads.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::resolver::{RequestFactory, RequestFactoryResolver};
/// use reqtemplate::template::MemoryTemplateLoader;
/// use std::sync::Arc;
///
/// let factory = RequestFactory::builder("AppRequests")
///     .method("loginRequest", "requests/login.json", ["username", "password"])
///     .build()
///     .unwrap();
/// let loader = MemoryTemplateLoader::new().with_template(
///     "requests/login.json",
///     r#"{"body":{"u":"{{username}}","p":"{{password}}"}}"#,
/// );
///
/// let resolver = RequestFactoryResolver::new(Arc::new(factory), Arc::new(loader));
/// let spec = resolver
///     .resolve("loginRequest", &["bob".into(), "pw1".into()])
///     .unwrap();
/// assert_eq!(spec.body.as_deref(), Some(r#"{"u":"bob","p":"pw1"}"#));
/// ```
#[derive(Clone)]
pub struct RequestFactoryResolver {
    factory: Arc<RequestFactory>,
    loader: Arc<dyn TemplateLoader>,
    materializer: TemplateMaterializer,
}

impl RequestFactoryResolver {
    /// Create a resolver for `factory` loading templates through `loader`.
    pub fn new(factory: Arc<RequestFactory>, loader: Arc<dyn TemplateLoader>) -> Self {
        Self {
            factory,
            loader,
            materializer: TemplateMaterializer::new(),
        }
    }

    /// Use a differently configured materializer.
    pub fn with_materializer(mut self, materializer: TemplateMaterializer) -> Self {
        self.materializer = materializer;
        self
    }

    /// The dispatch table.
    pub fn factory(&self) -> &RequestFactory {
        &self.factory
    }

    /// Build the placeholder bindings for a call.
    ///
    /// Scalar arguments bind under their declared parameter name; map
    /// arguments merge all their entries. Later arguments overwrite earlier
    /// bindings of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalUsage`] if the method is not declared, lacks a
    /// template, or the argument count differs from its parameter count.
    pub fn bindings(&self, method: &str, args: &[Argument]) -> Result<Bindings> {
        let (_, metadata) = self.tagged_method(method)?;

        if args.len() != metadata.params.len() {
            return Err(Error::IllegalUsage(format!(
                "'{}' declares {} parameters but was called with {} arguments",
                method,
                metadata.params.len(),
                args.len()
            )));
        }

        let mut bindings = Bindings::new();
        for (param, arg) in metadata.params.iter().zip(args) {
            match arg {
                Argument::Map(values) => {
                    bindings.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                Argument::Scalar(value) => {
                    bindings.insert(param.clone(), Value::String(value.clone()));
                }
            }
        }

        Ok(bindings)
    }

    /// Resolve a call into the materialized template sections.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The call is illegal (see [`bindings`](Self::bindings))
    /// - The template resource does not exist
    /// - Materialization fails
    pub fn resolve(&self, method: &str, args: &[Argument]) -> Result<ResolvedRequestSpec> {
        let (template, _) = self.tagged_method(method)?;
        let bindings = self.bindings(method, args)?;
        debug!(
            method,
            template,
            placeholders = ?bindings.keys().collect::<Vec<_>>(),
            "resolving request template"
        );

        let text = self.loader.load(template)?;
        self.materializer.materialize(template, &text, &bindings)
    }

    /// Resolve a call and layer the result onto `base`.
    ///
    /// # Errors
    ///
    /// As [`resolve`](Self::resolve).
    pub fn invoke(&self, base: &BaseRequest, method: &str, args: &[Argument]) -> Result<RequestSpec> {
        let spec = base.layer(self.resolve(method, args)?);
        debug!(
            method,
            url = %spec.url(),
            headers = ?spec.redacted_headers(),
            "request specification ready"
        );
        Ok(spec)
    }

    fn tagged_method(&self, method: &str) -> Result<(&str, &RequestMethod)> {
        let metadata = self.factory.method(method).ok_or_else(|| {
            Error::IllegalUsage(format!(
                "method '{}' is not declared on {}",
                method,
                self.factory.name()
            ))
        })?;

        let template = metadata.template().ok_or_else(|| {
            Error::IllegalUsage(format!(
                "method '{}' on {} has no request template",
                method,
                self.factory.name()
            ))
        })?;

        Ok((template, metadata))
    }
}
