//! Projection of the snapshot to and from local storage.
//!
//! Only lists, local-owned favorites and the details cache are written.
//! Loading flags and the error field never leave memory, and favorites owned
//! by the backend are dropped on both save and load so they are always
//! re-derived from the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::hooks::{report, ErrorHook, SwallowedError};
use super::policy::is_locally_owned;
use super::snapshot::{DetailsCache, StoreSnapshot};
use super::storage::{PersistenceError, StateStorage};
use crate::swapi::{EntitySummary, FavoriteRecord};

/// Storage key for the persisted state blob
pub const STORAGE_KEY: &str = "sw_store_v1";

/// On-disk shape: `{people, planets, vehicles, favorites, details}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
  #[serde(default)]
  pub people: Vec<EntitySummary>,
  #[serde(default)]
  pub planets: Vec<EntitySummary>,
  #[serde(default)]
  pub vehicles: Vec<EntitySummary>,
  #[serde(default)]
  pub favorites: Vec<FavoriteRecord>,
  #[serde(default)]
  pub details: DetailsCache,
}

impl PersistedState {
  fn project(snapshot: &StoreSnapshot) -> Self {
    Self {
      people: snapshot.people.clone(),
      planets: snapshot.planets.clone(),
      vehicles: snapshot.vehicles.clone(),
      favorites: local_favorites(&snapshot.favorites),
      details: snapshot.details.clone(),
    }
  }

  /// Rebuild a snapshot with cleared flags and no error.
  pub fn into_snapshot(self) -> StoreSnapshot {
    StoreSnapshot {
      people: self.people,
      planets: self.planets,
      vehicles: self.vehicles,
      favorites: local_favorites(&self.favorites),
      details: self.details,
      ..Default::default()
    }
  }
}

fn local_favorites(favorites: &[FavoriteRecord]) -> Vec<FavoriteRecord> {
  favorites
    .iter()
    .filter(|f| is_locally_owned(f.kind))
    .cloned()
    .collect()
}

/// Best-effort persistence adapter over a `StateStorage`.
pub struct Persistence<S: StateStorage> {
  storage: S,
  on_error: Option<ErrorHook>,
}

impl<S: StateStorage> Persistence<S> {
  pub fn new(storage: S) -> Self {
    Self {
      storage,
      on_error: None,
    }
  }

  pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
    self.on_error = Some(hook);
    self
  }

  /// Write the projected snapshot. Failures are reported, never returned.
  pub fn save(&self, snapshot: &StoreSnapshot) {
    if let Err(e) = self.try_save(snapshot) {
      report(self.on_error.as_ref(), SwallowedError::Persistence(e));
    }
  }

  fn try_save(&self, snapshot: &StoreSnapshot) -> Result<(), PersistenceError> {
    let data = serde_json::to_vec(&PersistedState::project(snapshot))?;
    self.storage.write(STORAGE_KEY, &data)?;
    debug!(bytes = data.len(), "state persisted");
    Ok(())
  }

  /// Read the persisted state. Missing, unreadable or corrupt data is `None`.
  pub fn load(&self) -> Option<PersistedState> {
    let data = match self.storage.read(STORAGE_KEY) {
      Ok(data) => data?,
      Err(e) => {
        report(self.on_error.as_ref(), SwallowedError::Persistence(e));
        return None;
      }
    };

    match serde_json::from_slice::<PersistedState>(&data) {
      Ok(mut state) => {
        state.favorites = local_favorites(&state.favorites);
        Some(state)
      }
      Err(e) => {
        debug!(error = %e, "discarding corrupt persisted state");
        None
      }
    }
  }

  /// When the state was last written, if known.
  pub fn saved_at(&self) -> Option<DateTime<Utc>> {
    self.storage.saved_at(STORAGE_KEY).ok().flatten()
  }
}
