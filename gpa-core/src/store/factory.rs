use std::collections::BTreeMap;

use super::key_value::{KeyValueStore, StoreError};

/// Which backend to open, and where.
///
/// `location` means whatever the chosen backend says it means: a JSON file
/// path for `file`, a database path or `:memory:` for `sqlite`, nothing for
/// `memory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: String,
    pub location: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            location: "gpa-state.json".to_string(),
        }
    }
}

/// Opens one kind of [`KeyValueStore`].
pub trait StoreFactory: Send + Sync {
    /// Name used in [`StoreConfig::backend`].
    fn backend_name(&self) -> &'static str;

    fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError>;
}

/// Backends known to the binary, looked up by name at start-up.
#[derive(Default)]
pub struct StoreRegistry {
    factories: BTreeMap<&'static str, Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a backend. A later factory with the same name wins.
    pub fn register(
        &mut self,
        factory: Box<dyn StoreFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names, in name order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Opens the store `config` asks for.
    ///
    /// # Errors
    ///
    /// [`StoreError::Configuration`] for an unregistered backend name;
    /// otherwise whatever the backend reports.
    pub fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(StoreError::Configuration(format!(
                "no store backend named '{}' (known: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        tracing::debug!(backend = %config.backend, location = %config.location, "opening store");
        factory.create(config)
    }
}
