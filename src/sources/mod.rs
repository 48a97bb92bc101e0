//! Property source implementations.

mod env;
mod file;
mod map;
mod property_source;

pub use env::EnvSource;
pub use file::{PropertiesFileSource, parse_properties};
pub use map::MapSource;
pub use property_source::{
    DEFAULT_FILE_PRIORITY, ENV_VAR_PRIORITY, ENVIRONMENT_FILE_PRIORITY, PropertySource,
    SYSTEM_PRIORITY,
};
