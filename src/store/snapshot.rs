//! The immutable application snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::swapi::{EntityDetail, EntityKind, EntitySummary, FavoriteRecord};

/// Per-kind detail cache, shaped `{people: {uid: detail}, planets: {...}, vehicles: {...}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsCache {
  #[serde(default)]
  pub people: BTreeMap<String, Arc<EntityDetail>>,
  #[serde(default)]
  pub planets: BTreeMap<String, Arc<EntityDetail>>,
  #[serde(default)]
  pub vehicles: BTreeMap<String, Arc<EntityDetail>>,
}

impl DetailsCache {
  pub fn of(&self, kind: EntityKind) -> &BTreeMap<String, Arc<EntityDetail>> {
    match kind {
      EntityKind::People => &self.people,
      EntityKind::Planets => &self.planets,
      EntityKind::Vehicles => &self.vehicles,
    }
  }

  pub fn of_mut(&mut self, kind: EntityKind) -> &mut BTreeMap<String, Arc<EntityDetail>> {
    match kind {
      EntityKind::People => &mut self.people,
      EntityKind::Planets => &mut self.planets,
      EntityKind::Vehicles => &mut self.vehicles,
    }
  }

  pub fn len(&self) -> usize {
    self.people.len() + self.planets.len() + self.vehicles.len()
  }
}

/// In-flight markers, one per list plus details, favorites and list sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
  pub people: bool,
  pub planets: bool,
  pub vehicles: bool,
  pub details: bool,
  pub favorites: bool,
  pub syncing: bool,
}

impl LoadingFlags {
  pub fn set_list(&mut self, kind: EntityKind, value: bool) {
    match kind {
      EntityKind::People => self.people = value,
      EntityKind::Planets => self.planets = value,
      EntityKind::Vehicles => self.vehicles = value,
    }
  }
}

#[cfg(test)]
impl LoadingFlags {
  pub fn list(&self, kind: EntityKind) -> bool {
    match kind {
      EntityKind::People => self.people,
      EntityKind::Planets => self.planets,
      EntityKind::Vehicles => self.vehicles,
    }
  }

  pub fn any(&self) -> bool {
    self.people || self.planets || self.vehicles || self.details || self.favorites || self.syncing
  }
}

/// Everything the UI renders from. Replaced wholesale on every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
  pub people: Vec<EntitySummary>,
  pub planets: Vec<EntitySummary>,
  pub vehicles: Vec<EntitySummary>,
  pub details: DetailsCache,
  pub favorites: Vec<FavoriteRecord>,
  pub loading: LoadingFlags,
  pub error: Option<String>,
}

impl StoreSnapshot {
  pub fn list(&self, kind: EntityKind) -> &[EntitySummary] {
    match kind {
      EntityKind::People => &self.people,
      EntityKind::Planets => &self.planets,
      EntityKind::Vehicles => &self.vehicles,
    }
  }

  pub fn set_list(&mut self, kind: EntityKind, items: Vec<EntitySummary>) {
    match kind {
      EntityKind::People => self.people = items,
      EntityKind::Planets => self.planets = items,
      EntityKind::Vehicles => self.vehicles = items,
    }
  }

  pub fn detail(&self, kind: EntityKind, uid: &str) -> Option<&Arc<EntityDetail>> {
    self.details.of(kind).get(uid)
  }

  pub fn summary(&self, kind: EntityKind, uid: &str) -> Option<&EntitySummary> {
    self.list(kind).iter().find(|s| s.uid == uid)
  }

  pub fn is_favorite(&self, kind: EntityKind, uid: &str) -> bool {
    self.favorites.iter().any(|f| f.matches(kind, uid))
  }

  /// Best known display name: detail `name` property, then list entry, then "Unknown".
  pub fn display_name(&self, kind: EntityKind, uid: &str) -> String {
    self
      .detail(kind, uid)
      .and_then(|d| d.name())
      .or_else(|| {
        self
          .summary(kind, uid)
          .map(|s| s.name.as_str())
          .filter(|n| !n.is_empty())
      })
      .unwrap_or("Unknown")
      .to_string()
  }
}
