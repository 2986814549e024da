//! Per-kind persistence and sync strategy.

use crate::swapi::EntityKind;

/// Who owns a kind's favorites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOwner {
  /// Kept in local storage only, never sent to the backend
  Local,
  /// Owned by the backend under the given type tag; local copy is a read-through cache
  Backend { tag: &'static str },
}

/// How fetched lists are mirrored into the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSync {
  None,
  /// Upsert every item into the named backend collection
  Upsert { collection: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindPolicy {
  pub kind: EntityKind,
  pub favorites: FavoriteOwner,
  pub sync: ListSync,
}

/// One entry per kind, in `EntityKind::ALL` order
pub static POLICIES: [KindPolicy; 3] = [
  KindPolicy {
    kind: EntityKind::People,
    favorites: FavoriteOwner::Backend { tag: "people" },
    sync: ListSync::Upsert {
      collection: "people",
    },
  },
  KindPolicy {
    kind: EntityKind::Planets,
    favorites: FavoriteOwner::Backend { tag: "planet" },
    sync: ListSync::Upsert {
      collection: "planets",
    },
  },
  KindPolicy {
    kind: EntityKind::Vehicles,
    favorites: FavoriteOwner::Local,
    sync: ListSync::None,
  },
];

impl KindPolicy {
  pub fn for_kind(kind: EntityKind) -> &'static KindPolicy {
    match kind {
      EntityKind::People => &POLICIES[0],
      EntityKind::Planets => &POLICIES[1],
      EntityKind::Vehicles => &POLICIES[2],
    }
  }

  /// Map a backend favorite tag back to its kind
  pub fn from_backend_tag(tag: &str) -> Option<&'static KindPolicy> {
    POLICIES
      .iter()
      .find(|p| matches!(p.favorites, FavoriteOwner::Backend { tag: t } if t == tag))
  }

  pub fn backend_tag(&self) -> Option<&'static str> {
    match self.favorites {
      FavoriteOwner::Backend { tag } => Some(tag),
      FavoriteOwner::Local => None,
    }
  }

  pub fn is_local(&self) -> bool {
    self.favorites == FavoriteOwner::Local
  }
}

/// Whether favorites of this kind may be kept in local storage
pub fn is_locally_owned(kind: EntityKind) -> bool {
  KindPolicy::for_kind(kind).is_local()
}
