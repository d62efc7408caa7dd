//! Process configuration.
//!
//! Layers an optional config file under `RANGEKV_`-prefixed environment
//! variables (e.g. `RANGEKV_STORAGE__BACKEND=memory`). A configuration
//! that cannot be loaded or parsed is fatal to initialization.

use std::path::Path;

use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use rangekv_storage::StorageConfig;

use crate::error::{StoreError, StoreResult};
use crate::keys::DEFAULT_ID_WIDTH;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageSection,

    /// Fixed identifier width; bounds the per-kind record count at
    /// `10^id_width - 1`.
    #[serde(default = "default_id_width")]
    pub id_width: usize,

    #[serde(default)]
    pub log: LogSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageSection::default(),
            id_width: default_id_width(),
            log: LogSection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_backend")]
    pub backend: String,

    #[serde(default)]
    pub connection_string: Option<String>,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self { backend: default_backend(), connection_string: None }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogSection {
    /// Environment filter, e.g. `"info,rangekv=debug"`.
    #[serde(default)]
    pub filter: Option<String>,
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_id_width() -> usize {
    DEFAULT_ID_WIDTH
}

impl Config {
    /// Load configuration from an optional file plus the environment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`]; callers are expected to
    /// treat this as fatal at startup.
    pub fn load(path: Option<&Path>) -> StoreResult<Self> {
        let mut builder = ConfigBuilder::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("RANGEKV").separator("__"));

        builder
            .build()
            .and_then(|loaded| loaded.try_deserialize())
            .map_err(|err| StoreError::Configuration(err.to_string()))
    }

    /// The storage-factory view of this configuration.
    pub fn storage_config(&self) -> StoreResult<StorageConfig> {
        let backend = self
            .storage
            .backend
            .parse()
            .map_err(|err: rangekv_storage::StorageError| {
                StoreError::Configuration(err.to_string())
            })?;
        Ok(StorageConfig { backend, connection_string: self.storage.connection_string.clone() })
    }
}
