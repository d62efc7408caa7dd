//! # Rangekv - Entity CRUD over Ordered Key-Value Storage
//!
//! Maps a generic entity CRUD interface onto any ordered key-value store
//! that offers point get/put/delete, atomic counters, and lexicographic
//! range scans — no query language required.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                EntityStore<S>                    │
//! │     save / load / list / remove / close          │
//! ├───────────┬───────────────┬──────────────────────┤
//! │   keys    │     ident     │        query         │
//! │ (encoder) │ (id counter)  │  (scan/filter/sort)  │
//! ├───────────┴───────────────┴──────────────────────┤
//! │            rangekv-storage                       │
//! │            StorageBackend trait                  │
//! │ (get, put, delete, increment, scan, delete_range)│
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Identifiers
//!
//! Identifiers are fixed-width, zero-padded decimal strings minted from
//! a per-kind atomic counter, so lexicographic key order equals numeric
//! insertion order and "list everything of a kind" is a single range
//! scan between the all-`'0'` and all-`'9'` identifiers.
//!
//! # Example
//!
//! ```ignore
//! use rangekv::{Entity, EntityKind, EntityStore, Query};
//! use rangekv_storage::MemoryBackend;
//! use serde_json::json;
//!
//! let store = EntityStore::builder().backend(MemoryBackend::new()).build();
//!
//! let kind = EntityKind::new("user");
//! let saved = store.save(Entity::new(kind.clone()).field("name", json!("foo"))).await?;
//! let loaded = store.load(&kind, &Query::Id(saved.id().unwrap().into())).await?;
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod ident;
pub mod keys;
pub mod logging;
pub mod query;
pub mod snapshot;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use ident::IdGenerator;
pub use logging::{LogConfig, LogFormat, init_logging};
pub use rangekv_types::{Entity, EntityKind, NormalizedQuery, Query, SortDirection};
pub use store::EntityStore;
