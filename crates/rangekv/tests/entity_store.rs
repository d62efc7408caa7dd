//! End-to-end CRUD tests over the in-memory backend.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashSet;
use std::sync::Arc;

use rangekv::{Config, Entity, EntityKind, EntityStore, Query, StoreError, keys};
use rangekv_storage::{
    KeyValue, MemoryBackend, StorageBackend, StorageError, StorageFactory, StorageResult,
};
use serde_json::{Value, json};

fn store() -> EntityStore<MemoryBackend> {
    EntityStore::builder().backend(MemoryBackend::new()).id_width(6).build()
}

fn query(value: Value) -> Query {
    Query::from_value(value)
}

// =============================================================================
// SAVE
// =============================================================================

#[tokio::test]
async fn test_save_assigns_unique_ordered_ids() {
    let store = store();
    let kind = EntityKind::new("user");

    let mut ids = Vec::new();
    for n in 0..20 {
        let saved = store.save(Entity::new(kind.clone()).field("n", json!(n))).await.unwrap();
        ids.push(saved.id().unwrap().to_string());
    }

    let unique: HashSet<_> = ids.iter().cloned().collect();
    assert_eq!(unique.len(), ids.len());

    // String order equals insertion (numeric) order.
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn test_save_then_load_round_trip() {
    let store = store();
    let kind = EntityKind::new("user");

    let saved =
        store.save(Entity::new(kind.clone()).field("name", json!("foo"))).await.unwrap();
    let id = saved.id().unwrap().to_string();

    let loaded = store.load(&kind, &Query::Id(id.clone())).await.unwrap().unwrap();
    assert_eq!(loaded.id(), Some(id.as_str()));
    assert_eq!(loaded.get("name"), Some(&json!("foo")));
}

#[tokio::test]
async fn test_save_with_id_hint_uses_hint() {
    let store = store();
    let kind = EntityKind::new("user");

    let saved = store
        .save(Entity::new(kind.clone()).field("id$", json!("000123")).field("name", json!("foo")))
        .await
        .unwrap();
    assert_eq!(saved.id(), Some("000123"));

    let loaded = store.load(&kind, &Query::from("000123")).await.unwrap().unwrap();
    assert_eq!(loaded.get("name"), Some(&json!("foo")));
    // The hint directive is never persisted.
    assert!(loaded.get("id$").is_none());
}

#[tokio::test]
async fn test_save_with_sentinel_hint_generates_id() {
    let store = store();
    let kind = EntityKind::new("user");

    let saved = store.save(Entity::new(kind.clone()).field("id$", json!(-1))).await.unwrap();
    assert_eq!(saved.id(), Some("000001"));
}

#[tokio::test]
async fn test_update_overwrites_single_record() {
    let store = store();
    let kind = EntityKind::new("user");

    let mut saved =
        store.save(Entity::new(kind.clone()).field("name", json!("old"))).await.unwrap();
    saved.set("name", json!("new"));
    store.save(saved).await.unwrap();

    let all = store.list(&kind, &Query::Empty).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].get("name"), Some(&json!("new")));
}

#[tokio::test]
async fn test_concurrent_saves_get_distinct_ids() {
    let store = Arc::new(store());
    let kind = EntityKind::new("user");

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        let kind = kind.clone();
        tasks.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for _ in 0..8 {
                let saved = store.save(Entity::new(kind.clone())).await.unwrap();
                ids.push(saved.id().unwrap().to_string());
            }
            ids
        }));
    }

    let mut all = Vec::new();
    for task in tasks {
        all.extend(task.await.unwrap());
    }
    let unique: HashSet<_> = all.iter().cloned().collect();
    assert_eq!(unique.len(), 16 * 8);
}

// =============================================================================
// LOAD
// =============================================================================

#[tokio::test]
async fn test_load_miss_is_none_not_error() {
    let store = store();
    let loaded = store.load(&EntityKind::new("user"), &Query::from("000042")).await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_load_without_id_returns_first_match() {
    let store = store();
    let kind = EntityKind::new("user");

    store.save(Entity::new(kind.clone()).field("color", json!("red"))).await.unwrap();
    store.save(Entity::new(kind.clone()).field("color", json!("blue"))).await.unwrap();
    store.save(Entity::new(kind.clone()).field("color", json!("blue"))).await.unwrap();

    let loaded = store.load(&kind, &query(json!({"color": "blue"}))).await.unwrap().unwrap();
    assert_eq!(loaded.get("color"), Some(&json!("blue")));
    // First in identifier order wins.
    assert_eq!(loaded.id(), Some("000002"));
}

#[tokio::test]
async fn test_point_load_of_corrupt_payload_is_none() {
    let store = store();
    let kind = EntityKind::new("user");

    store.native().put(keys::encode(&kind, "000009"), b"not json".to_vec()).await.unwrap();

    let loaded = store.load(&kind, &Query::from("000009")).await.unwrap();
    assert!(loaded.is_none());
}

// =============================================================================
// LIST
// =============================================================================

async fn seed_numbers(store: &EntityStore<MemoryBackend>, kind: &EntityKind) {
    for a in [1, 2, 3] {
        store.save(Entity::new(kind.clone()).field("a", json!(a))).await.unwrap();
    }
}

#[tokio::test]
async fn test_list_sort_descending() {
    let store = store();
    let kind = EntityKind::new("num");
    seed_numbers(&store, &kind).await;

    let rows = store.list(&kind, &query(json!({"sort$": {"a": -1}}))).await.unwrap();
    let values: Vec<_> = rows.iter().map(|row| row.get("a").cloned().unwrap()).collect();
    assert_eq!(values, vec![json!(3), json!(2), json!(1)]);
}

#[tokio::test]
async fn test_list_sort_skip_limit_composition() {
    let store = store();
    let kind = EntityKind::new("num");
    seed_numbers(&store, &kind).await;

    let rows = store
        .list(&kind, &query(json!({"sort$": {"a": 1}, "skip$": 1, "limit$": 1})))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("a"), Some(&json!(2)));
}

#[tokio::test]
async fn test_list_filters_on_equality() {
    let store = store();
    let kind = EntityKind::new("num");
    seed_numbers(&store, &kind).await;

    let rows = store.list(&kind, &query(json!({"a": 2}))).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("a"), Some(&json!(2)));
}

#[tokio::test]
async fn test_list_skips_corrupt_rows() {
    let store = store();
    let kind = EntityKind::new("user");

    store.save(Entity::new(kind.clone()).field("name", json!("ok"))).await.unwrap();
    store.native().put(keys::encode(&kind, "000999"), b"not json".to_vec()).await.unwrap();

    let rows = store.list(&kind, &Query::Empty).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&json!("ok")));
}

#[tokio::test]
async fn test_list_never_sees_counter_or_other_kinds() {
    let store = store();
    let users = EntityKind::new("user");
    let orders = EntityKind::new("order");

    store.save(Entity::new(users.clone())).await.unwrap();
    store.save(Entity::new(orders.clone())).await.unwrap();
    store.save(Entity::new(orders.clone())).await.unwrap();

    assert_eq!(store.list(&users, &Query::Empty).await.unwrap().len(), 1);
    assert_eq!(store.list(&orders, &Query::Empty).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_kinds_with_same_name_different_base_are_isolated() {
    let store = store();
    let plain = EntityKind::new("user");
    let based = EntityKind::based("app", "user");

    store.save(Entity::new(plain.clone())).await.unwrap();
    store.save(Entity::new(based.clone())).await.unwrap();

    assert_eq!(store.list(&plain, &Query::Empty).await.unwrap().len(), 1);
    assert_eq!(store.list(&based, &Query::Empty).await.unwrap().len(), 1);
}

// =============================================================================
// REMOVE
// =============================================================================

#[tokio::test]
async fn test_remove_returns_data_by_default() {
    let store = store();
    let kind = EntityKind::new("user");

    let saved =
        store.save(Entity::new(kind.clone()).field("name", json!("foo"))).await.unwrap();
    let id = saved.id().unwrap().to_string();

    let removed = store.remove(&kind, &Query::Id(id.clone())).await.unwrap().unwrap();
    assert_eq!(removed.get("name"), Some(&json!("foo")));

    assert!(store.load(&kind, &Query::Id(id)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_remove_load_false_still_deletes() {
    let store = store();
    let kind = EntityKind::new("user");

    let saved = store.save(Entity::new(kind.clone())).await.unwrap();
    let id = saved.id().unwrap().to_string();

    let removed =
        store.remove(&kind, &query(json!({"id": id, "load$": false}))).await.unwrap();
    assert!(removed.is_none());
    assert!(store.load(&kind, &Query::Id(id)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_remove_missing_is_noop() {
    let store = store();
    let removed =
        store.remove(&EntityKind::new("user"), &Query::from("000042")).await.unwrap();
    assert!(removed.is_none());
}

#[tokio::test]
async fn test_remove_all_ignores_equality_filters() {
    let store = store();
    let kind = EntityKind::new("user");

    store.save(Entity::new(kind.clone()).field("color", json!("red"))).await.unwrap();
    store.save(Entity::new(kind.clone()).field("color", json!("blue"))).await.unwrap();

    // "delete all" matches on kind only, by design.
    store.remove(&kind, &query(json!({"color": "red", "all$": true}))).await.unwrap();

    assert!(store.list(&kind, &Query::Empty).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_all_leaves_other_kinds_and_counter() {
    let store = store();
    let users = EntityKind::new("user");
    let orders = EntityKind::new("order");

    store.save(Entity::new(users.clone())).await.unwrap();
    store.save(Entity::new(orders.clone())).await.unwrap();

    store.remove(&users, &query(json!({"all$": true}))).await.unwrap();

    assert!(store.list(&users, &Query::Empty).await.unwrap().is_empty());
    assert_eq!(store.list(&orders, &Query::Empty).await.unwrap().len(), 1);

    // The counter survived: the next id continues the sequence.
    let next = store.save(Entity::new(users.clone())).await.unwrap();
    assert_eq!(next.id(), Some("000002"));
}

// =============================================================================
// FAILURE PROPAGATION
// =============================================================================

/// Backend whose every operation reports a connection failure.
#[derive(Clone)]
struct OfflineBackend;

#[async_trait::async_trait]
impl StorageBackend for OfflineBackend {
    async fn get(&self, _key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Err(StorageError::connection("backend offline"))
    }

    async fn put(&self, _key: Vec<u8>, _value: Vec<u8>) -> StorageResult<()> {
        Err(StorageError::connection("backend offline"))
    }

    async fn delete(&self, _key: &[u8]) -> StorageResult<()> {
        Err(StorageError::connection("backend offline"))
    }

    async fn increment(&self, _key: &[u8], _delta: i64) -> StorageResult<i64> {
        Err(StorageError::connection("backend offline"))
    }

    async fn scan(&self, _start: &[u8], _end: &[u8], _limit: usize) -> StorageResult<Vec<KeyValue>> {
        Err(StorageError::connection("backend offline"))
    }

    async fn delete_range(&self, _start: &[u8], _end: &[u8], _limit: usize) -> StorageResult<u64> {
        Err(StorageError::connection("backend offline"))
    }
}

fn offline_store() -> EntityStore<OfflineBackend> {
    EntityStore::builder().backend(OfflineBackend).id_width(6).build()
}

#[tokio::test]
async fn test_save_surfaces_backend_failure_unmodified() {
    let store = offline_store();
    // Fails at id allocation, the first store call of the chain.
    let err = store.save(Entity::new(EntityKind::new("user"))).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
    assert_eq!(
        err.to_string(),
        "store unavailable: Storage connection error: backend offline"
    );
}

#[tokio::test]
async fn test_save_with_id_surfaces_put_failure() {
    let store = offline_store();
    let mut ent = Entity::new(EntityKind::new("user"));
    ent.set_id("000001");
    let err = store.save(ent).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn test_load_surfaces_backend_failure() {
    let store = offline_store();
    let kind = EntityKind::new("user");

    let err = store.load(&kind, &Query::from("000001")).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));

    // The no-id path fails in the range scan instead.
    let err = store.load(&kind, &Query::Empty).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn test_list_surfaces_backend_failure() {
    let store = offline_store();
    let err = store.list(&EntityKind::new("user"), &Query::Empty).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn test_remove_surfaces_backend_failure() {
    let store = offline_store();
    let kind = EntityKind::new("user");

    let err = store.remove(&kind, &Query::from("000001")).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));

    let err = store.remove(&kind, &query(json!({"all$": true}))).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

// =============================================================================
// CONFIG / FACTORY WIRING
// =============================================================================

#[tokio::test]
async fn test_store_built_from_config_through_factory() {
    let config = Config::default();
    let backend = StorageFactory::create(config.storage_config().unwrap()).await.unwrap();
    let store = EntityStore::builder().backend(backend).id_width(config.id_width).build();

    let kind = EntityKind::new("user");
    let saved =
        store.save(Entity::new(kind.clone()).field("name", json!("foo"))).await.unwrap();
    let id = saved.id().unwrap().to_string();
    assert_eq!(id.len(), config.id_width);

    let loaded = store.load(&kind, &Query::Id(id)).await.unwrap().unwrap();
    assert_eq!(loaded.get("name"), Some(&json!("foo")));
}

// =============================================================================
// CLOSE / NATIVE
// =============================================================================

#[tokio::test]
async fn test_close_completes() {
    let store = store();
    store.close().await.unwrap();
}

#[tokio::test]
async fn test_native_exposes_backend() {
    let store = store();
    let kind = EntityKind::new("user");
    store.save(Entity::new(kind.clone())).await.unwrap();

    let raw = store.native().get(&keys::encode(&kind, "000001")).await.unwrap();
    assert!(raw.is_some());
}
