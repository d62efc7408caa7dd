//! Adapter-level error taxonomy.
//!
//! Maps transport failures, payload decode failures, and startup
//! configuration failures onto three caller-visible variants. Transport
//! errors are never retried internally; they are logged with operation
//! context at the call site and returned unmodified.

use rangekv_storage::StorageError;

/// Result type alias for adapter operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the entity store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Any underlying transport/database failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored payload could not be parsed.
    ///
    /// During range scans this is handled per-row (bad rows are
    /// dropped); on point loads it yields a null result. It only
    /// surfaces as an error when encoding an outbound payload fails.
    #[error("decode error: {0}")]
    Decode(String),

    /// The store could not be opened or configured at startup.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_maps_to_unavailable() {
        let err: StoreError = StorageError::timeout().into();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(err.to_string(), "store unavailable: Operation timed out");
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
