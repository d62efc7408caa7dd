//! Bulk snapshot maintenance operations.
//!
//! Thin I/O glue over the adapter: `dump` materializes every decodable
//! record in the keyspace, `export` writes that snapshot to a JSON
//! file, and `import` plays a snapshot file back into the store.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use rangekv_storage::StorageBackend;

use crate::error::StoreResult;
use crate::store::EntityStore;

/// Scan the entire keyspace and return key → decoded record.
///
/// Values that are not JSON are skipped; counter keys hold raw i64
/// bytes, so they drop out here rather than needing special casing.
pub async fn dump<S: StorageBackend>(
    store: &EntityStore<S>,
) -> StoreResult<BTreeMap<String, Value>> {
    let rows = store.native().scan(&[], &[], 0).await?;

    let mut snapshot = BTreeMap::new();
    for row in rows {
        let Ok(key) = String::from_utf8(row.key) else {
            continue;
        };
        let Ok(value) = serde_json::from_slice::<Value>(&row.value) else {
            continue;
        };
        snapshot.insert(key, value);
    }
    Ok(snapshot)
}

/// Write a [`dump`] snapshot to `path` as pretty-printed JSON.
pub async fn export<S: StorageBackend>(
    store: &EntityStore<S>,
    path: impl AsRef<Path>,
) -> StoreResult<()> {
    let snapshot = dump(store).await?;
    let bytes = serde_json::to_vec_pretty(&snapshot)?;
    tokio::fs::write(path.as_ref(), bytes).await?;
    debug!(path = %path.as_ref().display(), entries = snapshot.len(), "export");
    Ok(())
}

/// Read a snapshot file and put every entry back, overwriting existing
/// keys. Counters are not part of a snapshot and are left untouched.
pub async fn import<S: StorageBackend>(
    store: &EntityStore<S>,
    path: impl AsRef<Path>,
) -> StoreResult<()> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let snapshot: BTreeMap<String, Value> = serde_json::from_slice(&bytes)?;

    let entries = snapshot.len();
    for (key, value) in snapshot {
        let payload = serde_json::to_vec(&value)?;
        store.native().put(key.into_bytes(), payload).await?;
    }
    debug!(path = %path.as_ref().display(), entries, "import");
    Ok(())
}
