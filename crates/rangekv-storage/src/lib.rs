//! # Rangekv Storage - Ordered Key-Value Transport
//!
//! Provides the [`StorageBackend`] trait the adapter layer is built on,
//! plus the in-memory implementation and the backend factory.
//!
//! ## Contract
//!
//! - Keys and values are opaque byte strings; keys order
//!   lexicographically.
//! - `put` has upsert semantics; `get` returns `None` for a missing key.
//! - `increment` is atomic and creates the counter implicitly, so the
//!   first increment by 1 yields 1.
//! - `scan` and `delete_range` take a start-inclusive, end-exclusive
//!   range; an empty `end` means "to the end of the keyspace" and a
//!   `limit` of 0 means unlimited.
//!
//! All operations are asynchronous and report a single success/error
//! outcome. Backends must tolerate concurrent outstanding calls.

#![deny(unsafe_code)]

use std::sync::Arc;

use async_trait::async_trait;

pub mod error;
pub mod factory;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use factory::{BackendType, StorageConfig, StorageFactory};
pub use memory::MemoryBackend;

/// A key together with its stored value, as returned by range scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// The abstract ordered key-value store interface.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Point read. Returns `None` if the key does not exist.
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Point write with upsert semantics.
    async fn put(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()>;

    /// Point delete. Deleting a missing key is not an error.
    async fn delete(&self, key: &[u8]) -> StorageResult<()>;

    /// Atomically add `delta` to the counter stored at `key` and return
    /// the resulting value. The counter is created on first use.
    async fn increment(&self, key: &[u8], delta: i64) -> StorageResult<i64>;

    /// Ordered scan over `[start, end)` in key order.
    ///
    /// An empty `end` scans to the end of the keyspace; `limit == 0`
    /// means unlimited.
    async fn scan(&self, start: &[u8], end: &[u8], limit: usize) -> StorageResult<Vec<KeyValue>>;

    /// Delete every key in `[start, end)`, returning the number of keys
    /// removed. Same range and limit semantics as [`scan`].
    ///
    /// [`scan`]: StorageBackend::scan
    async fn delete_range(&self, start: &[u8], end: &[u8], limit: usize) -> StorageResult<u64>;
}

// Lets a factory-produced `Arc<dyn StorageBackend>` be used anywhere a
// backend is expected, including as the (Clone-bounded) store handle.
#[async_trait]
impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn put(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        (**self).delete(key).await
    }

    async fn increment(&self, key: &[u8], delta: i64) -> StorageResult<i64> {
        (**self).increment(key, delta).await
    }

    async fn scan(&self, start: &[u8], end: &[u8], limit: usize) -> StorageResult<Vec<KeyValue>> {
        (**self).scan(start, end, limit).await
    }

    async fn delete_range(&self, start: &[u8], end: &[u8], limit: usize) -> StorageResult<u64> {
        (**self).delete_range(start, end, limit).await
    }
}
