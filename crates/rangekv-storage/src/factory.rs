//! Storage factory for creating backend instances.
//!
//! Provides a way to instantiate storage backends without exposing
//! implementation details to consumers.

use std::str::FromStr;
use std::sync::Arc;

use crate::memory::MemoryBackend;
use crate::{StorageBackend, StorageError, StorageResult};

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// In-memory storage (for testing and development).
    Memory,
}

impl FromStr for BackendType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(BackendType::Memory),
            _ => Err(StorageError::internal(format!("Unknown backend type: {s}"))),
        }
    }
}

impl BackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Memory => "memory",
        }
    }
}

/// Configuration for a storage backend.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend type to use.
    pub backend: BackendType,
    /// Optional connection string (for database backends).
    pub connection_string: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::memory()
    }
}

impl StorageConfig {
    /// Create config for the memory backend.
    pub fn memory() -> Self {
        Self { backend: BackendType::Memory, connection_string: None }
    }
}

/// Storage factory for creating backend instances.
pub struct StorageFactory;

impl StorageFactory {
    /// Create a storage backend from configuration.
    pub async fn create(config: StorageConfig) -> StorageResult<Arc<dyn StorageBackend>> {
        match config.backend {
            BackendType::Memory => Ok(Arc::new(MemoryBackend::new()) as Arc<dyn StorageBackend>),
        }
    }
}
