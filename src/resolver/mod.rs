//! Resolvers dispatching declared interface methods to their metadata.
//!
//! Each declared interface is a dispatch table built once at startup: method
//! name to method metadata. Invoking a method looks its metadata up and
//! resolves it against the property store or the template namespace.

mod config;
mod request;

pub use config::{ConfigInterface, ConfigInterfaceBuilder, ConfigMethod, ConfigResolver};
pub use request::{
    Argument, RequestFactory, RequestFactoryBuilder, RequestFactoryResolver, RequestMethod,
};
