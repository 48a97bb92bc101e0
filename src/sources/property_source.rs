//! Property source trait.

use crate::error::Result;
use std::collections::HashMap;

/// Default priority for explicitly supplied (system-level) properties.
pub const SYSTEM_PRIORITY: i32 = 100;
/// Default priority for process environment variables.
pub const ENV_VAR_PRIORITY: i32 = 200;
/// Default priority for the environment-specific properties file.
pub const ENVIRONMENT_FILE_PRIORITY: i32 = 300;
/// Default priority for the default/common properties file.
pub const DEFAULT_FILE_PRIORITY: i32 = 400;

/// Trait for property sources.
///
/// A source produces a flat map of case-sensitive keys to untyped string
/// values. Sources are merged lowest priority first, so a source with a higher
/// priority overwrites colliding keys of every source loaded before it.
///
/// Implement this trait to feed properties from somewhere other than the
/// built-in sources (a vault, a CI secret store, a fixture).
pub trait PropertySource: Send + Sync {
    /// Load all properties from this source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed.
    fn load(&self) -> Result<HashMap<String, String>>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;

    /// Get the priority of this source (higher = loaded later, wins collisions).
    ///
    /// Default priorities:
    /// - System properties: 100
    /// - Environment variables: 200
    /// - Environment-specific file: 300
    /// - Default file: 400
    fn priority(&self) -> i32 {
        SYSTEM_PRIORITY
    }
}
