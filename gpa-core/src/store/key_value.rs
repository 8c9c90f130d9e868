use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// String key-value medium the calculator state is persisted to.
///
/// Implementations are synchronous; every call completes before returning.
pub trait KeyValueStore: Send {
    fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    fn set(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(
        &mut self,
        key: &str,
    ) -> Result<(), StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;
}
