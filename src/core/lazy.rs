//! One-time initialization slot for a shared property store.

use crate::core::PropertyStore;
use crate::error::Result;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Holds a [`PropertyStore`] that is loaded at most once and read lock-free
/// afterwards.
///
/// The first caller of [`get_or_init`](Self::get_or_init) runs the loader
/// while holding the initialization guard; concurrent callers wait on the
/// guard, then see the stored instance. Once the slot is filled every read is
/// a single atomic load.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::core::{PropertyStore, SharedPropertyStore};
///
/// # fn example() -> reqtemplate::error::Result<()> {
/// let shared = SharedPropertyStore::new();
/// let store = shared.get_or_init(|| {
///     Ok(PropertyStore::from_map("local", [("BASE_URL", "https://example.com")]))
/// })?;
/// assert_eq!(store.get("BASE_URL"), Some("https://example.com"));
/// assert!(shared.is_initialized());
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct SharedPropertyStore {
    slot: ArcSwapOption<PropertyStore>,
    init: Mutex<()>,
}

impl SharedPropertyStore {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
            init: Mutex::new(()),
        }
    }

    /// Create a slot already holding `store`; the initializer never runs.
    pub fn from_store(store: PropertyStore) -> Self {
        Self {
            slot: ArcSwapOption::from_pointee(store),
            init: Mutex::new(()),
        }
    }

    /// Get the store, loading it with `init` if this is the first access.
    ///
    /// # Errors
    ///
    /// Returns whatever `init` returns on failure. The slot stays empty, so a
    /// later call may try again.
    pub fn get_or_init<F>(&self, init: F) -> Result<Arc<PropertyStore>>
    where
        F: FnOnce() -> Result<PropertyStore>,
    {
        if let Some(store) = self.slot.load_full() {
            return Ok(store);
        }

        let _guard = self.init.lock();
        // Another thread may have finished while we waited.
        if let Some(store) = self.slot.load_full() {
            return Ok(store);
        }

        debug!("initializing shared property store");
        let store = Arc::new(init()?);
        self.slot.store(Some(Arc::clone(&store)));
        Ok(store)
    }

    /// Get the store if it has been initialized.
    pub fn get(&self) -> Option<Arc<PropertyStore>> {
        self.slot.load_full()
    }

    /// Whether the store has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl Default for SharedPropertyStore {
    fn default() -> Self {
        Self::new()
    }
}
