use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const VISUAL_GUIDE_BASE: &str = "https://starwars-visualguide.com/assets/img";

/// The three catalog collections the app works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  People,
  Planets,
  Vehicles,
}

impl EntityKind {
  pub const ALL: [EntityKind; 3] = [EntityKind::People, EntityKind::Planets, EntityKind::Vehicles];

  /// Path segment used by the catalog API
  pub fn as_str(&self) -> &'static str {
    match self {
      EntityKind::People => "people",
      EntityKind::Planets => "planets",
      EntityKind::Vehicles => "vehicles",
    }
  }

  /// Visual Guide image for an entity. People live under "characters".
  pub fn image_url(&self, uid: &str) -> String {
    let folder = match self {
      EntityKind::People => "characters",
      EntityKind::Planets => "planets",
      EntityKind::Vehicles => "vehicles",
    };
    format!("{}/{}/{}.jpg", VISUAL_GUIDE_BASE, folder, uid)
  }

  /// One-line blurb shown on detail pages
  pub fn subtitle(&self) -> &'static str {
    match self {
      EntityKind::People => "A person within the Star Wars universe.",
      EntityKind::Planets => "A planet within the Star Wars universe.",
      EntityKind::Vehicles => "A vehicle within the Star Wars universe.",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// List entry for a catalog entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
  #[serde(rename = "type")]
  pub kind: EntityKind,
  pub uid: String,
  pub name: String,
  pub url: String,
}

/// Full entity record from the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityDetail {
  pub uid: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub properties: BTreeMap<String, String>,
}

impl EntityDetail {
  /// The `name` property, when the API provided one
  pub fn name(&self) -> Option<&str> {
    self
      .properties
      .get("name")
      .map(String::as_str)
      .filter(|n| !n.is_empty())
  }
}

/// A favorited entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
  #[serde(rename = "type")]
  pub kind: EntityKind,
  pub uid: String,
  pub name: String,
}

impl FavoriteRecord {
  pub fn new(kind: EntityKind, uid: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      kind,
      uid: uid.into(),
      name: name.into(),
    }
  }

  pub fn matches(&self, kind: EntityKind, uid: &str) -> bool {
    self.kind == kind && self.uid == uid
  }
}
