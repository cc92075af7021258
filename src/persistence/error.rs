//! Persistence error types

use thiserror::Error;

use crate::platform::StorageError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Storage missing, full or refusing access
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Stored record is not valid JSON or has the wrong shape
    #[error("malformed stored state: {0}")]
    Parse(#[source] serde_json::Error),
}
