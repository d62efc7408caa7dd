//! The CRUD orchestrator.

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use rangekv_storage::StorageBackend;
use rangekv_types::{Entity, EntityKind, NormalizedQuery, Query};

use crate::error::{StoreError, StoreResult};
use crate::ident::IdGenerator;
use crate::keys;
use crate::query;

/// Entity CRUD over an ordered key-value backend.
///
/// Holds no entity state across calls; the only process-local state is
/// the backend handle, created once at configuration time and shared
/// read/write across all concurrent operations the backend permits.
/// Store errors are logged with their operation context and returned
/// unmodified — no retries, no partial rollback.
pub struct EntityStore<S: StorageBackend> {
    backend: S,
    ids: IdGenerator<S>,
}

#[bon::bon]
impl<S: StorageBackend + Clone> EntityStore<S> {
    /// Create an entity store over the given backend.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = EntityStore::builder()
    ///     .backend(MemoryBackend::new())
    ///     .id_width(10)
    ///     .build();
    /// ```
    #[builder]
    pub fn new(
        backend: S,
        #[builder(default = keys::DEFAULT_ID_WIDTH)] id_width: usize,
    ) -> Self {
        Self { ids: IdGenerator::new(backend.clone(), id_width), backend }
    }
}

impl<S: StorageBackend> EntityStore<S> {
    /// Create-or-update an entity, returning it with `id` populated.
    ///
    /// An entity carrying an id is an update of that key. Otherwise the
    /// caller's `id$` hint is used when supplied, else a fresh
    /// identifier is minted. Either way the persisted payload is the
    /// JSON object of the entity's data fields.
    pub async fn save(&self, mut entity: Entity) -> StoreResult<Entity> {
        let id = match entity.id() {
            Some(id) => id.to_string(),
            None => match entity.take_id_hint() {
                Some(hint) => hint,
                None => self.ids.next(entity.kind()).await?,
            },
        };
        entity.set_id(id.clone());

        let key = keys::encode(entity.kind(), &id);
        let payload = serde_json::to_vec(&entity.data())?;
        self.backend.put(key, payload).await.map_err(|err| {
            error!(kind = %entity.kind(), %id, %err, "save failed");
            StoreError::from(err)
        })?;

        debug!(kind = %entity.kind(), %id, "save");
        Ok(entity)
    }

    /// Load a single entity.
    ///
    /// A query carrying an id is a point get (other filter fields are
    /// ignored on this path); a miss or an undecodable payload yields
    /// `None`, not an error. Without an id this delegates to [`list`]
    /// and returns the first match.
    ///
    /// [`list`]: EntityStore::list
    pub async fn load(&self, kind: &EntityKind, query: &Query) -> StoreResult<Option<Entity>> {
        let normalized = NormalizedQuery::normalize(query);
        self.load_normalized(kind, &normalized).await
    }

    async fn load_normalized(
        &self,
        kind: &EntityKind,
        query: &NormalizedQuery,
    ) -> StoreResult<Option<Entity>> {
        let Some(id) = query.id() else {
            let mut found = query::list(&self.backend, kind, query, self.ids.width()).await?;
            if found.is_empty() {
                return Ok(None);
            }
            return Ok(Some(found.remove(0)));
        };

        let key = keys::encode(kind, id);
        let Some(bytes) = self.backend.get(&key).await.map_err(|err| {
            error!(%kind, %id, %err, "load failed");
            StoreError::from(err)
        })?
        else {
            return Ok(None);
        };

        match serde_json::from_slice::<Map<String, Value>>(&bytes) {
            Ok(record) => {
                debug!(%kind, %id, "load");
                Ok(Some(Entity::from_record(kind.clone(), record)))
            }
            Err(err) => {
                warn!(%kind, %id, %err, "undecodable payload on point load");
                Ok(None)
            }
        }
    }

    /// List entities of a kind matching the query, in identifier order
    /// unless a sort option reorders them.
    pub async fn list(&self, kind: &EntityKind, query: &Query) -> StoreResult<Vec<Entity>> {
        let normalized = NormalizedQuery::normalize(query);
        let found = query::list(&self.backend, kind, &normalized, self.ids.width()).await?;
        debug!(%kind, rows = found.len(), "list");
        Ok(found)
    }

    /// Remove entities of a kind.
    ///
    /// With the `all$` option this is a bulk range delete over the
    /// kind's whole identifier range — filter-blind by design; equality
    /// filters are ignored. Otherwise exactly one matching record is
    /// resolved via [`load`] and point-deleted; the removed entity's
    /// data is returned iff the `load$` option is set (default true).
    /// Nothing matching is a no-op returning `None`.
    ///
    /// Load-then-delete is two store calls with no cross-call
    /// isolation: a concurrent writer can race between them.
    ///
    /// [`load`]: EntityStore::load
    pub async fn remove(&self, kind: &EntityKind, query: &Query) -> StoreResult<Option<Entity>> {
        let normalized = NormalizedQuery::normalize(query);

        if normalized.all {
            let start = keys::scan_start(kind, self.ids.width());
            let end = keys::scan_end(kind, self.ids.width());
            let removed = self.backend.delete_range(&start, &end, 0).await.map_err(|err| {
                error!(%kind, %err, "remove/all failed");
                StoreError::from(err)
            })?;
            debug!(%kind, removed, "remove/all");
            return Ok(None);
        }

        let Some(found) = self.load_normalized(kind, &normalized).await? else {
            return Ok(None);
        };
        let Some(id) = found.id().map(str::to_string) else {
            return Ok(None);
        };

        let key = keys::encode(kind, &id);
        self.backend.delete(&key).await.map_err(|err| {
            error!(%kind, %id, %err, "remove failed");
            StoreError::from(err)
        })?;

        debug!(%kind, %id, "remove");
        Ok(normalized.load.then_some(found))
    }

    /// Release per-call resources. There are none — the backend handle
    /// is process-lifetime — but the call completes normally to
    /// preserve the calling protocol.
    pub async fn close(&self) -> StoreResult<()> {
        debug!("close");
        Ok(())
    }

    /// Escape hatch: the underlying backend handle, untransformed.
    pub fn native(&self) -> &S {
        &self.backend
    }

    /// Configured identifier width.
    pub fn id_width(&self) -> usize {
        self.ids.width()
    }
}
