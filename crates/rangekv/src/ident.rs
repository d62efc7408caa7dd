//! Monotonic identifier generation.

use rangekv_storage::StorageBackend;
use rangekv_types::EntityKind;
use tracing::error;

use crate::error::{StoreError, StoreResult};
use crate::keys;

/// Mints unique, lexicographically-ordered identifiers per entity kind.
///
/// Each identifier is one atomic increment of the kind's counter key,
/// zero-padded to a fixed width, so for identifiers of equal width
/// string order equals numeric order and range scans behave as numeric
/// range scans. Uniqueness and arrival ordering are delegated entirely
/// to the store's increment serialization; the numeric value is not
/// otherwise meaningful.
///
/// Hard ceiling: once the counter exceeds `10^width - 1` the padding
/// invariant breaks. Not handled; `width` bounds the per-kind record
/// count.
pub struct IdGenerator<S> {
    backend: S,
    width: usize,
}

impl<S: StorageBackend> IdGenerator<S> {
    pub fn new(backend: S, width: usize) -> Self {
        Self { backend, width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Allocate the next identifier for `kind`.
    ///
    /// Fails with [`StoreError::Unavailable`] if the increment call
    /// fails; never retried.
    pub async fn next(&self, kind: &EntityKind) -> StoreResult<String> {
        let key = keys::counter(kind);
        let value = self.backend.increment(&key, 1).await.map_err(|err| {
            error!(%kind, %err, "id allocation failed");
            StoreError::from(err)
        })?;
        let width = self.width;
        Ok(format!("{value:0width$}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use rangekv_storage::MemoryBackend;

    #[tokio::test]
    async fn test_ids_are_zero_padded() {
        let ids = IdGenerator::new(MemoryBackend::new(), 6);
        let kind = EntityKind::new("user");
        assert_eq!(ids.next(&kind).await.unwrap(), "000001");
        assert_eq!(ids.next(&kind).await.unwrap(), "000002");
    }

    #[tokio::test]
    async fn test_string_order_matches_numeric_order() {
        let ids = IdGenerator::new(MemoryBackend::new(), 8);
        let kind = EntityKind::new("user");

        let mut minted = Vec::new();
        for _ in 0..50 {
            minted.push(ids.next(&kind).await.unwrap());
        }

        let mut sorted = minted.clone();
        sorted.sort();
        assert_eq!(minted, sorted);
    }

    #[tokio::test]
    async fn test_counters_are_per_kind() {
        let ids = IdGenerator::new(MemoryBackend::new(), 4);
        assert_eq!(ids.next(&EntityKind::new("user")).await.unwrap(), "0001");
        assert_eq!(ids.next(&EntityKind::new("order")).await.unwrap(), "0001");
        assert_eq!(ids.next(&EntityKind::based("app", "user")).await.unwrap(), "0001");
        assert_eq!(ids.next(&EntityKind::new("user")).await.unwrap(), "0002");
    }
}
