//! Storage error types

use promptload_core::SinkError;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for SinkError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Io(e) => SinkError::Io(e),
            StorageError::Serialization(e) => SinkError::Serialization(e),
            StorageError::Database(e) => SinkError::Database(e.to_string()),
        }
    }
}
