//! Key-value storage backends for the GPA calculator.
//!
//! | backend  | type               | medium |
//! |----------|--------------------|--------|
//! | `memory` | [`MemoryStore`]    | process memory, lost on exit |
//! | `file`   | [`JsonFileStore`]  | one pretty-printed JSON object on disk |
//! | `sqlite` | [`SqliteStore`]    | a single `kv` table |

mod factory;
mod file;
mod memory;
mod sqlite;

use gpa_core::store::StoreRegistry;

pub use factory::{FileStoreFactory, MemoryStoreFactory, SqliteStoreFactory};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A registry with every backend in this crate registered.
pub fn default_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(MemoryStoreFactory));
    registry.register(Box::new(FileStoreFactory));
    registry.register(Box::new(SqliteStoreFactory));
    registry
}
