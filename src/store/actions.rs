//! Store operations: list and detail loading, favorites and reconciliation.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::hooks::ErrorHook;
use super::persist::Persistence;
use super::policy::{is_locally_owned, KindPolicy};
use super::snapshot::StoreSnapshot;
use super::state::StateCell;
use super::storage::StateStorage;
use super::sync::SyncOrchestrator;
use crate::swapi::api_types::ApiFavorite;
use crate::swapi::{
  ApiError, CatalogClient, EntityDetail, EntityKind, FavoriteRecord, FavoritesClient,
};

/// The application store.
///
/// Owns the snapshot and every collaborator the operations need. Operations
/// catch remote errors at their boundary and record them in the snapshot's
/// error field; nothing is returned to the caller except the detail record
/// from `load_detail`.
pub struct Store<S: StateStorage> {
  state: StateCell,
  catalog: CatalogClient,
  backend: FavoritesClient,
  persistence: Persistence<S>,
  sync: SyncOrchestrator,
}

impl<S: StateStorage> Store<S> {
  /// Build a store, restoring whatever `storage` holds.
  pub fn open(
    catalog: CatalogClient,
    backend: FavoritesClient,
    storage: S,
    on_error: Option<ErrorHook>,
  ) -> Self {
    let mut persistence = Persistence::new(storage);
    if let Some(hook) = &on_error {
      persistence = persistence.with_error_hook(Arc::clone(hook));
    }

    let snapshot = match persistence.load() {
      Some(saved) => {
        debug!("restored persisted state");
        saved.into_snapshot()
      }
      None => StoreSnapshot::default(),
    };
    let state = StateCell::new(snapshot);

    let mut sync = SyncOrchestrator::new(backend.clone(), state.clone());
    if let Some(hook) = on_error {
      sync = sync.with_error_hook(hook);
    }

    Self {
      state,
      catalog,
      backend,
      persistence,
      sync,
    }
  }

  /// Current snapshot for rendering.
  pub fn snapshot(&self) -> Arc<StoreSnapshot> {
    self.state.get()
  }

  /// When local state was last written, if the storage tracks it.
  pub fn saved_at(&self) -> Option<DateTime<Utc>> {
    self.persistence.saved_at()
  }

  /// Load the list for `kind`.
  ///
  /// A non-empty list in memory skips the fetch, but the list is still
  /// pushed to the backend every time.
  pub async fn load_list(&self, kind: EntityKind) {
    let current = self.state.get();
    if !current.list(kind).is_empty() {
      debug!(%kind, "list already loaded, skipping fetch");
      self.sync.sync_list(kind, current.list(kind)).await;
      return;
    }

    self.state.update(|s| {
      s.loading.set_list(kind, true);
      s.error = None;
    });

    match self.catalog.fetch_list(kind).await {
      Ok(items) => {
        info!(%kind, count = items.len(), "list loaded");
        let snapshot = self.state.update(|s| {
          s.set_list(kind, items);
          s.loading.set_list(kind, false);
        });
        self.persistence.save(&snapshot);
        self.sync.sync_list(kind, snapshot.list(kind)).await;
      }
      Err(e) => {
        warn!(%kind, error = %e, "list load failed");
        let snapshot = self.state.update(|s| {
          s.loading.set_list(kind, false);
          s.error = Some(e.to_string());
        });
        self.persistence.save(&snapshot);
      }
    }
  }

  /// Load all three lists concurrently.
  pub async fn load_all_lists(&self) {
    futures::join!(
      self.load_list(EntityKind::People),
      self.load_list(EntityKind::Planets),
      self.load_list(EntityKind::Vehicles),
    );
  }

  /// Get a detail record, from the cache when present.
  ///
  /// Returns `None` when the fetch fails; the error is in the snapshot.
  pub async fn load_detail(&self, kind: EntityKind, uid: &str) -> Option<Arc<EntityDetail>> {
    if let Some(cached) = self.state.get().detail(kind, uid) {
      return Some(Arc::clone(cached));
    }

    self.state.update(|s| {
      s.loading.details = true;
      s.error = None;
    });

    match self.catalog.fetch_detail(kind, uid).await {
      Ok(detail) => {
        let detail = Arc::new(detail);
        let snapshot = self.state.update(|s| {
          s.details
            .of_mut(kind)
            .insert(uid.to_string(), Arc::clone(&detail));
          s.loading.details = false;
        });
        self.persistence.save(&snapshot);
        Some(detail)
      }
      Err(e) => {
        warn!(%kind, uid, error = %e, "detail load failed");
        let snapshot = self.state.update(|s| {
          s.loading.details = false;
          s.error = Some(e.to_string());
        });
        self.persistence.save(&snapshot);
        None
      }
    }
  }

  pub fn is_favorite(&self, kind: EntityKind, uid: &str) -> bool {
    self.state.get().is_favorite(kind, uid)
  }

  /// Remove the favorite if present, add it otherwise.
  ///
  /// The check and the mutation are separate steps; two concurrent toggles
  /// on the same entity can both decide to add.
  pub async fn toggle_favorite(&self, kind: EntityKind, uid: &str, name: &str) {
    if self.is_favorite(kind, uid) {
      self.remove_favorite(kind, uid).await;
    } else {
      self
        .add_favorite(FavoriteRecord::new(kind, uid, name))
        .await;
    }
  }

  pub async fn add_favorite(&self, record: FavoriteRecord) {
    let policy = KindPolicy::for_kind(record.kind);

    let Some(tag) = policy.backend_tag() else {
      let snapshot = self.state.update(|s| {
        if !s.is_favorite(record.kind, &record.uid) {
          s.favorites.push(record);
        }
      });
      self.persistence.save(&snapshot);
      return;
    };

    match self
      .backend
      .add_favorite(tag, &record.uid, &record.name)
      .await
    {
      Ok(()) => {
        info!(kind = %record.kind, uid = %record.uid, "favorite added");
        self.load_favorites().await;
      }
      Err(e) => self.fail("add favorite", e),
    }
  }

  pub async fn remove_favorite(&self, kind: EntityKind, uid: &str) {
    let policy = KindPolicy::for_kind(kind);

    let Some(tag) = policy.backend_tag() else {
      let snapshot = self.state.update(|s| s.favorites.retain(|f| !f.matches(kind, uid)));
      self.persistence.save(&snapshot);
      return;
    };

    match self.backend.remove_favorite(tag, uid).await {
      Ok(()) => {
        info!(%kind, uid, "favorite removed");
        self.load_favorites().await;
      }
      Err(e) => self.fail("remove favorite", e),
    }
  }

  /// Replace favorites with local-owned ones plus whatever the backend holds.
  pub async fn load_favorites(&self) {
    self.state.update(|s| {
      s.loading.favorites = true;
      s.error = None;
    });

    match self.backend.list_favorites().await {
      Ok(remote) => {
        let remote = from_backend(remote);
        let snapshot = self.state.update(|s| {
          s.favorites = merge_favorites(&s.favorites, remote);
          s.loading.favorites = false;
        });
        debug!(count = snapshot.favorites.len(), "favorites reconciled");
        self.persistence.save(&snapshot);
      }
      Err(e) => {
        warn!(error = %e, "favorites load failed");
        self.state.update(|s| {
          s.loading.favorites = false;
          s.error = Some(e.to_string());
        });
      }
    }
  }

  fn fail(&self, action: &str, error: ApiError) {
    warn!(action, %error, "backend call failed");
    self.state.update(|s| s.error = Some(error.to_string()));
  }
}

/// Map backend records to favorites, dropping unknown type tags.
fn from_backend(records: Vec<ApiFavorite>) -> Vec<FavoriteRecord> {
  records
    .into_iter()
    .filter_map(|r| {
      let Some(policy) = KindPolicy::from_backend_tag(&r.tag) else {
        debug!(tag = %r.tag, "dropping favorite with unknown type");
        return None;
      };
      Some(FavoriteRecord::new(policy.kind, r.uid, r.name))
    })
    .collect()
}

/// Local-owned favorites first, then backend ones, first occurrence of each (kind, uid) wins.
fn merge_favorites(current: &[FavoriteRecord], remote: Vec<FavoriteRecord>) -> Vec<FavoriteRecord> {
  let mut seen = HashSet::new();

  current
    .iter()
    .filter(|f| is_locally_owned(f.kind))
    .cloned()
    .chain(remote)
    .filter(|f| seen.insert((f.kind, f.uid.clone())))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::persist::STORAGE_KEY;
  use crate::store::snapshot::LoadingFlags;
  use crate::store::storage::MemoryStorage;
  use pretty_assertions::assert_eq;
  use std::time::Duration;
  use wiremock::matchers::{any, body_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  struct Harness {
    catalog: MockServer,
    backend: MockServer,
  }

  impl Harness {
    async fn start() -> Self {
      Self {
        catalog: MockServer::start().await,
        backend: MockServer::start().await,
      }
    }

    fn store<S: StateStorage>(&self, storage: S) -> Store<S> {
      Store::open(
        CatalogClient::new(&self.catalog.uri()).unwrap(),
        FavoritesClient::new(&self.backend.uri(), 1).unwrap(),
        storage,
        None,
      )
    }

    async fn backend_favorites(&self, body: serde_json::Value) {
      Mock::given(method("GET"))
        .and(path("/users/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&self.backend)
        .await;
    }
  }

  fn people_list() -> serde_json::Value {
    serde_json::json!({
      "results": [
        {"uid": "1", "name": "Luke Skywalker", "url": "https://www.swapi.tech/api/people/1"},
        {"uid": "2", "name": "C-3PO", "url": "https://www.swapi.tech/api/people/2"}
      ]
    })
  }

  #[test]
  fn test_merge_keeps_local_vehicles_first_and_dedupes() {
    let current = vec![
      FavoriteRecord::new(EntityKind::People, "9", "stale"),
      FavoriteRecord::new(EntityKind::Vehicles, "4", "X-wing"),
    ];
    let remote = vec![
      FavoriteRecord::new(EntityKind::People, "1", "Luke"),
      FavoriteRecord::new(EntityKind::People, "1", "Luke again"),
    ];

    assert_eq!(
      merge_favorites(&current, remote),
      vec![
        FavoriteRecord::new(EntityKind::Vehicles, "4", "X-wing"),
        FavoriteRecord::new(EntityKind::People, "1", "Luke"),
      ]
    );
  }

  #[tokio::test]
  async fn test_vehicle_favorites_round_trip_locally() {
    let h = Harness::start().await;
    Mock::given(any())
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&h.backend)
      .await;
    let store = h.store(MemoryStorage::new());

    store
      .add_favorite(FavoriteRecord::new(EntityKind::Vehicles, "4", "Sand Crawler"))
      .await;
    store
      .add_favorite(FavoriteRecord::new(EntityKind::Vehicles, "4", "Sand Crawler"))
      .await;
    assert!(store.is_favorite(EntityKind::Vehicles, "4"));
    assert_eq!(store.snapshot().favorites.len(), 1);

    store.remove_favorite(EntityKind::Vehicles, "4").await;
    assert!(!store.is_favorite(EntityKind::Vehicles, "4"));

    store.toggle_favorite(EntityKind::Vehicles, "7", "X-34").await;
    assert!(store.is_favorite(EntityKind::Vehicles, "7"));
    store.toggle_favorite(EntityKind::Vehicles, "7", "X-34").await;
    assert!(!store.is_favorite(EntityKind::Vehicles, "7"));
  }

  #[tokio::test]
  async fn test_backend_favorites_round_trip() {
    for (kind, tag, uid, name) in [
      (EntityKind::People, "people", "1", "Luke Skywalker"),
      (EntityKind::Planets, "planet", "2", "Alderaan"),
    ] {
      let h = Harness::start().await;
      let store = h.store(MemoryStorage::new());

      Mock::given(method("POST"))
        .and(path(format!("/favorite/{}/{}", tag, uid)))
        .and(body_json(serde_json::json!({ "name": name })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&h.backend)
        .await;
      h.backend_favorites(serde_json::json!([{ "type": tag, "uid": uid, "name": name }]))
        .await;

      store.add_favorite(FavoriteRecord::new(kind, uid, name)).await;
      assert!(store.is_favorite(kind, uid), "{kind} should be favorited");

      h.backend.reset().await;
      Mock::given(method("DELETE"))
        .and(path(format!("/favorite/{}/{}", tag, uid)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.backend)
        .await;
      h.backend_favorites(serde_json::json!([])).await;

      store.remove_favorite(kind, uid).await;
      assert!(!store.is_favorite(kind, uid), "{kind} should be removed");
      assert_eq!(store.snapshot().error, None);
    }
  }

  #[tokio::test]
  async fn test_second_load_list_skips_catalog() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
      .and(path("/people"))
      .respond_with(ResponseTemplate::new(200).set_body_json(people_list()))
      .expect(1)
      .mount(&h.catalog)
      .await;
    // Both loads re-sync both items
    Mock::given(method("POST"))
      .and(path("/people"))
      .respond_with(ResponseTemplate::new(201))
      .expect(4)
      .mount(&h.backend)
      .await;

    let store = h.store(MemoryStorage::new());
    store.load_list(EntityKind::People).await;
    store.load_list(EntityKind::People).await;

    let snap = store.snapshot();
    assert_eq!(snap.people.len(), 2);
    assert!(!snap.loading.people);
    assert!(!snap.loading.syncing);
  }

  #[tokio::test]
  async fn test_restored_list_is_synced_not_fetched() {
    let h = Harness::start().await;
    let storage = MemoryStorage::new();
    let saved = serde_json::json!({
      "planets": [{"type": "planets", "uid": "1", "name": "Tatooine", "url": ""}]
    });
    storage
      .write(STORAGE_KEY, &serde_json::to_vec(&saved).unwrap())
      .unwrap();

    Mock::given(any())
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&h.catalog)
      .await;
    Mock::given(method("POST"))
      .and(path("/planets"))
      .and(body_json(serde_json::json!({"uid": "1", "name": "Tatooine"})))
      .respond_with(ResponseTemplate::new(409))
      .expect(1)
      .mount(&h.backend)
      .await;

    let store = h.store(storage);
    store.load_list(EntityKind::Planets).await;

    assert_eq!(store.snapshot().planets.len(), 1);
    assert_eq!(store.snapshot().error, None);
  }

  #[tokio::test]
  async fn test_load_list_failure_sets_error() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
      .and(path("/vehicles"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&h.catalog)
      .await;

    let store = h.store(MemoryStorage::new());
    store.load_list(EntityKind::Vehicles).await;

    let snap = store.snapshot();
    assert!(snap.vehicles.is_empty());
    assert!(!snap.loading.vehicles);
    assert_eq!(
      snap.error.as_deref(),
      Some("Failed fetching vehicles: 503 Service Unavailable")
    );
  }

  #[tokio::test]
  async fn test_load_all_lists_fills_every_kind() {
    let h = Harness::start().await;
    for kind in EntityKind::ALL {
      Mock::given(method("GET"))
        .and(path(format!("/{}", kind)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "results": [{"uid": "1", "name": format!("first {}", kind), "url": ""}]
        })))
        .expect(1)
        .mount(&h.catalog)
        .await;
    }
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(201))
      .expect(2)
      .mount(&h.backend)
      .await;

    let store = h.store(MemoryStorage::new());
    store.load_all_lists().await;

    let snap = store.snapshot();
    for kind in EntityKind::ALL {
      assert_eq!(snap.list(kind).len(), 1);
    }
    assert!(!snap.loading.any());
  }

  #[tokio::test]
  async fn test_vehicle_favorites_never_reach_backend() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
      .and(path("/favorite/people/1"))
      .respond_with(ResponseTemplate::new(201))
      .mount(&h.backend)
      .await;
    h.backend_favorites(serde_json::json!([{"type": "people", "uid": "1", "name": "Luke"}]))
      .await;

    let store = h.store(MemoryStorage::new());
    store.toggle_favorite(EntityKind::Vehicles, "4", "X-wing").await;
    store.toggle_favorite(EntityKind::People, "1", "Luke").await;
    store.remove_favorite(EntityKind::Vehicles, "4").await;

    let requests = h.backend.received_requests().await.unwrap();
    assert!(!requests.is_empty());
    for request in requests {
      let body = String::from_utf8_lossy(&request.body);
      assert!(!body.contains("X-wing"), "vehicle leaked: {body}");
      assert!(!request.url.path().contains("vehicle"));
    }
  }

  #[tokio::test]
  async fn test_reloaded_state_has_no_backend_favorites() {
    let h = Harness::start().await;
    h.backend_favorites(serde_json::json!([
      {"type": "people", "uid": "1", "name": "Luke"},
      {"type": "planet", "uid": "2", "name": "Alderaan"}
    ]))
    .await;
    let storage = Arc::new(MemoryStorage::new());

    let store = h.store(Arc::clone(&storage));
    store
      .add_favorite(FavoriteRecord::new(EntityKind::Vehicles, "4", "X-wing"))
      .await;
    store.load_favorites().await;
    assert_eq!(store.snapshot().favorites.len(), 3);
    drop(store);

    let reopened = h.store(storage);
    assert_eq!(
      reopened.snapshot().favorites,
      vec![FavoriteRecord::new(EntityKind::Vehicles, "4", "X-wing")]
    );
  }

  #[tokio::test]
  async fn test_load_favorites_merges_local_and_remote() {
    let h = Harness::start().await;
    h.backend_favorites(serde_json::json!([
      {"type": "people", "uid": "1", "name": "Luke"},
      {"type": "starship", "uid": "9", "name": "Millennium Falcon"},
      {"type": "people", "uid": 1, "name": "Luke"}
    ]))
    .await;

    let store = h.store(MemoryStorage::new());
    store
      .add_favorite(FavoriteRecord::new(EntityKind::Vehicles, "4", "X-wing"))
      .await;
    store.load_favorites().await;

    let snap = store.snapshot();
    assert_eq!(
      snap.favorites,
      vec![
        FavoriteRecord::new(EntityKind::Vehicles, "4", "X-wing"),
        FavoriteRecord::new(EntityKind::People, "1", "Luke"),
      ]
    );
    assert!(!snap.loading.favorites);
  }

  #[tokio::test]
  async fn test_load_favorites_failure_keeps_list() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
      .and(path("/users/favorites"))
      .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
      .mount(&h.backend)
      .await;

    let store = h.store(MemoryStorage::new());
    store
      .add_favorite(FavoriteRecord::new(EntityKind::Vehicles, "4", "X-wing"))
      .await;
    store.load_favorites().await;

    let snap = store.snapshot();
    assert_eq!(snap.favorites.len(), 1);
    assert!(!snap.loading.favorites);
    assert_eq!(snap.error.as_deref(), Some("Backend error 500: db down"));
  }

  #[tokio::test]
  async fn test_rejected_add_leaves_favorites_alone() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
      .and(path("/favorite/planet/2"))
      .respond_with(ResponseTemplate::new(400).set_body_string("bad planet"))
      .mount(&h.backend)
      .await;
    Mock::given(method("GET"))
      .and(path("/users/favorites"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
      .expect(0)
      .mount(&h.backend)
      .await;

    let store = h.store(MemoryStorage::new());
    store
      .add_favorite(FavoriteRecord::new(EntityKind::Planets, "2", "Alderaan"))
      .await;

    let snap = store.snapshot();
    assert!(snap.favorites.is_empty());
    assert_eq!(snap.error.as_deref(), Some("Backend error 400: bad planet"));
  }

  #[tokio::test]
  async fn test_detail_is_cached_by_reference() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
      .and(path("/people/1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": {
          "uid": "1",
          "description": "A person within the Star Wars universe",
          "properties": {"name": "Luke Skywalker", "height": "172"}
        }
      })))
      .expect(1)
      .mount(&h.catalog)
      .await;

    let store = h.store(MemoryStorage::new());
    let first = store.load_detail(EntityKind::People, "1").await.unwrap();
    let second = store.load_detail(EntityKind::People, "1").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.properties["height"], "172");
    assert!(!store.snapshot().loading.details);
    assert_eq!(store.snapshot().display_name(EntityKind::People, "1"), "Luke Skywalker");
  }

  #[tokio::test]
  async fn test_detail_failure_returns_none() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
      .and(path("/planets/404"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&h.catalog)
      .await;

    let store = h.store(MemoryStorage::new());
    let detail = store.load_detail(EntityKind::Planets, "404").await;

    assert!(detail.is_none());
    let snap = store.snapshot();
    assert!(!snap.loading.details);
    assert!(snap.error.as_deref().unwrap().contains("planets 404"));
    assert!(snap.detail(EntityKind::Planets, "404").is_none());
  }

  #[tokio::test]
  async fn test_one_bad_backend_favorite_keeps_the_rest() {
    let h = Harness::start().await;
    h.backend_favorites(serde_json::json!([
      {"type": "people", "uid": "1", "name": "Luke"},
      {"type": "planet", "uid": "2", "name": null},
      {"uid": "3", "name": "missing type"}
    ]))
    .await;

    let store = h.store(MemoryStorage::new());
    store.load_favorites().await;

    let snap = store.snapshot();
    assert_eq!(snap.error, None);
    assert_eq!(
      snap.favorites,
      vec![
        FavoriteRecord::new(EntityKind::People, "1", "Luke"),
        FavoriteRecord::new(EntityKind::Planets, "2", ""),
      ]
    );
  }

  #[tokio::test]
  async fn test_concurrent_toggles_both_add() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
      .and(path("/favorite/people/1"))
      .respond_with(ResponseTemplate::new(201))
      .expect(2)
      .mount(&h.backend)
      .await;
    h.backend_favorites(serde_json::json!([{"type": "people", "uid": "1", "name": "Luke"}]))
      .await;

    let store = h.store(MemoryStorage::new());
    futures::join!(
      store.toggle_favorite(EntityKind::People, "1", "Luke"),
      store.toggle_favorite(EntityKind::People, "1", "Luke"),
    );

    assert!(store.is_favorite(EntityKind::People, "1"));
    assert_eq!(store.snapshot().favorites.len(), 1);
  }

  /// Sample the loading flags `after` the start of the caller's operation.
  async fn flags_after(store: &Store<MemoryStorage>, after: Duration) -> LoadingFlags {
    tokio::time::sleep(after).await;
    store.snapshot().loading
  }

  #[tokio::test]
  async fn test_list_and_sync_flags_raised_while_in_flight() {
    let h = Harness::start().await;
    let delay = Duration::from_millis(300);
    Mock::given(method("GET"))
      .and(path("/people"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(people_list())
          .set_delay(delay),
      )
      .mount(&h.catalog)
      .await;
    Mock::given(method("POST"))
      .and(path("/people"))
      .respond_with(ResponseTemplate::new(201).set_delay(delay))
      .mount(&h.backend)
      .await;

    let store = h.store(MemoryStorage::new());
    let ((), fetching, syncing) = futures::join!(
      store.load_list(EntityKind::People),
      flags_after(&store, Duration::from_millis(100)),
      flags_after(&store, Duration::from_millis(500)),
    );

    assert!(fetching.people);
    assert!(!fetching.syncing);
    assert!(!syncing.people);
    assert!(syncing.syncing);

    let done = store.snapshot().loading;
    assert!(!done.people);
    assert!(!done.syncing);
  }

  #[tokio::test]
  async fn test_details_flag_raised_while_in_flight() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
      .and(path("/vehicles/4"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(serde_json::json!({
            "result": {"uid": "4", "properties": {"name": "Sand Crawler"}}
          }))
          .set_delay(Duration::from_millis(300)),
      )
      .mount(&h.catalog)
      .await;

    let store = h.store(MemoryStorage::new());
    let (detail, during) = futures::join!(
      store.load_detail(EntityKind::Vehicles, "4"),
      flags_after(&store, Duration::from_millis(100)),
    );

    assert!(detail.is_some());
    assert!(during.details);
    assert!(!store.snapshot().loading.details);
  }

  #[tokio::test]
  async fn test_favorites_flag_raised_while_in_flight() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
      .and(path("/users/favorites"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(serde_json::json!([{"type": "planet", "uid": "2", "name": "Alderaan"}]))
          .set_delay(Duration::from_millis(300)),
      )
      .mount(&h.backend)
      .await;

    let store = h.store(MemoryStorage::new());
    let ((), during) = futures::join!(
      store.load_favorites(),
      flags_after(&store, Duration::from_millis(100)),
    );

    assert!(during.favorites);
    assert!(!store.snapshot().loading.favorites);
    assert!(store.is_favorite(EntityKind::Planets, "2"));
  }
}
