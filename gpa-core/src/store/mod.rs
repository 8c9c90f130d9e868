pub mod factory;
pub mod key_value;
pub mod persistence;

pub use factory::{StoreConfig, StoreFactory, StoreRegistry};
pub use key_value::{KeyValueStore, StoreError};
pub use persistence::{Persistence, SAVE_PREF_KEY, STATE_KEY};
