//! In-memory storage backend for testing and development.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{KeyValue, StorageBackend, StorageError, StorageResult};

/// In-memory ordered key-value store.
///
/// Keys live in a `BTreeMap`, giving lexicographic scan order for free.
/// Counters share the keyspace with regular values and are stored as
/// little-endian i64 bytes. Cloning shares the underlying map, so a
/// clone sees the same data.
#[derive(Clone)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self { data: Arc::new(RwLock::new(BTreeMap::new())) }
    }

    /// Number of keys currently stored, counters included.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn range_bounds<'a>(
    start: &'a [u8],
    end: &'a [u8],
) -> Option<(Bound<&'a [u8]>, Bound<&'a [u8]>)> {
    if end.is_empty() {
        return Some((Bound::Included(start), Bound::Unbounded));
    }
    // An inverted or empty range selects nothing; BTreeMap::range would
    // panic on it.
    if start >= end {
        return None;
    }
    Some((Bound::Included(start), Bound::Excluded(end)))
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn put(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        self.data.write().await.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.data.write().await.remove(key);
        Ok(())
    }

    async fn increment(&self, key: &[u8], delta: i64) -> StorageResult<i64> {
        // The write lock serializes concurrent increments.
        let mut data = self.data.write().await;
        let current = match data.get(key) {
            Some(bytes) => {
                let bytes: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StorageError::internal(format!(
                        "counter at {} holds a non-counter value",
                        String::from_utf8_lossy(key)
                    ))
                })?;
                i64::from_le_bytes(bytes)
            }
            None => 0,
        };
        let next = current + delta;
        data.insert(key.to_vec(), next.to_le_bytes().to_vec());
        Ok(next)
    }

    async fn scan(&self, start: &[u8], end: &[u8], limit: usize) -> StorageResult<Vec<KeyValue>> {
        let Some(bounds) = range_bounds(start, end) else {
            return Ok(Vec::new());
        };
        let data = self.data.read().await;
        let rows = data
            .range::<[u8], _>(bounds)
            .map(|(key, value)| KeyValue { key: key.clone(), value: value.clone() })
            .take(if limit == 0 { usize::MAX } else { limit })
            .collect();
        Ok(rows)
    }

    async fn delete_range(&self, start: &[u8], end: &[u8], limit: usize) -> StorageResult<u64> {
        let Some(bounds) = range_bounds(start, end) else {
            return Ok(0);
        };
        let mut data = self.data.write().await;
        let doomed: Vec<Vec<u8>> = data
            .range::<[u8], _>(bounds)
            .map(|(key, _)| key.clone())
            .take(if limit == 0 { usize::MAX } else { limit })
            .collect();
        for key in &doomed {
            data.remove(key);
        }
        Ok(doomed.len() as u64)
    }
}
