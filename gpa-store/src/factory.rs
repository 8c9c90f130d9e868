use gpa_core::store::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

use crate::file::JsonFileStore;
use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;

/// [`StoreFactory`] for the volatile `"memory"` backend. The location is ignored.
pub struct MemoryStoreFactory;

impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        Ok(Box::new(MemoryStore::new()))
    }
}

/// [`StoreFactory`] for the `"file"` backend.
///
/// ```rust,no_run
/// use gpa_core::store::{StoreConfig, StoreRegistry};
/// use gpa_store::FileStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(FileStoreFactory));
/// let store = registry.create(&StoreConfig::default()).unwrap();
/// ```
pub struct FileStoreFactory;

impl StoreFactory for FileStoreFactory {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    /// `config.location` is the JSON file path; it is created on first write.
    fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        Ok(Box::new(JsonFileStore::open(&config.location)?))
    }
}

/// [`StoreFactory`] for the `"sqlite"` backend.
pub struct SqliteStoreFactory;

impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Accepted locations:
    /// * A bare file path, e.g. `"gpa.db"`. The file is created if missing.
    /// * `":memory:"`, an ephemeral database.
    fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let store = if config.location == ":memory:" {
            SqliteStore::open_in_memory()?
        } else {
            SqliteStore::open(&config.location)?
        };
        Ok(Box::new(store))
    }
}
