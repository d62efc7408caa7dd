//! Error types for storage backend operations.

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Backend connection or communication error.
    #[error("Storage connection error: {message}")]
    Connection { message: String },

    /// Operation timed out.
    #[error("Operation timed out")]
    Timeout,

    /// Internal backend error.
    #[error("Internal storage error: {message}")]
    Internal { message: String },
}

impl StorageError {
    pub fn connection(message: impl Into<String>) -> Self {
        StorageError::Connection { message: message.into() }
    }

    pub fn timeout() -> Self {
        StorageError::Timeout
    }

    pub fn internal(message: impl Into<String>) -> Self {
        StorageError::Internal { message: message.into() }
    }
}
