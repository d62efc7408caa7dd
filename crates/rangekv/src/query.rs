//! Range-scan backed list queries.
//!
//! Emulates "list all of a kind, filtered and sorted" on a store whose
//! only read primitives are point get and ordered range scan: scan the
//! kind's full identifier range, decode each row, filter in memory,
//! then sort, skip, and limit.

use serde_json::{Map, Value};
use tracing::{error, warn};

use rangekv_storage::{KeyValue, StorageBackend};
use rangekv_types::{Entity, EntityKind, NormalizedQuery, SortDirection, compare_values};

use crate::error::{StoreError, StoreResult};
use crate::keys;

/// Scan the kind's entire identifier range, returning raw rows in key
/// order (hence identifier order, hence roughly insertion order).
pub async fn scan_kind<S: StorageBackend>(
    backend: &S,
    kind: &EntityKind,
    width: usize,
) -> StoreResult<Vec<KeyValue>> {
    let start = keys::scan_start(kind, width);
    let end = keys::scan_end(kind, width);
    backend.scan(&start, &end, 0).await.map_err(|err| {
        error!(%kind, %err, "range scan failed");
        StoreError::from(err)
    })
}

/// Run a full list query: scan, decode, filter, sort, skip, limit.
///
/// Rows that fail to decode as a JSON object are dropped, not surfaced,
/// so one corrupt record cannot fail a whole listing.
pub async fn list<S: StorageBackend>(
    backend: &S,
    kind: &EntityKind,
    query: &NormalizedQuery,
    width: usize,
) -> StoreResult<Vec<Entity>> {
    let rows = scan_kind(backend, kind, width).await?;

    let mut records: Vec<Map<String, Value>> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_slice::<Map<String, Value>>(&row.value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(%kind, key = %String::from_utf8_lossy(&row.key), %err, "dropping undecodable row");
                None
            }
        })
        .filter(|record| query.matches(record))
        .collect();

    if let Some((field, direction)) = &query.sort {
        // Stable sort keeps key order among equal sort values.
        records.sort_by(|a, b| {
            let ordering = compare_values(
                a.get(field).unwrap_or(&Value::Null),
                b.get(field).unwrap_or(&Value::Null),
            );
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    if let Some(skip) = query.skip {
        records.drain(..skip.min(records.len()));
    }

    if let Some(limit) = query.limit {
        records.truncate(limit);
    }

    Ok(records.into_iter().map(|record| Entity::from_record(kind.clone(), record)).collect())
}
