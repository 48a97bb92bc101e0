//! Property store loading and sharing.

mod builder;
mod lazy;
mod loader;
mod store;
mod validation;

pub use builder::{
    DEFAULT_ENVIRONMENT, DEFAULT_ENVIRONMENT_KEY, ENVIRONMENT_TOKEN, Precedence,
    PropertyStoreBuilder,
};
pub use lazy::SharedPropertyStore;
pub(crate) use loader::PropertyLoader;
pub use store::PropertyStore;
pub use validation::{RequiredKeys, Validate};
