//! Serde-deserializable types matching the catalog and backend responses.
//!
//! These types are separate from domain types to allow lenient deserialization
//! while keeping domain types focused on application needs.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use super::types::{EntityDetail, EntityKind, EntitySummary};

/// Accept ids sent either as JSON strings or numbers.
fn deserialize_uid<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(deserializer)? {
    Value::String(s) => Ok(s),
    Value::Number(n) => Ok(n.to_string()),
    other => Err(serde::de::Error::custom(format!(
      "expected string or number uid, got {}",
      other
    ))),
  }
}

// ============================================================================
// Catalog list endpoint: GET /{type}
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiListResponse {
  #[serde(default)]
  pub results: Vec<ApiListItem>,
}

#[derive(Debug, Deserialize)]
pub struct ApiListItem {
  #[serde(deserialize_with = "deserialize_uid")]
  pub uid: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub url: String,
}

impl ApiListItem {
  pub fn into_summary(self, kind: EntityKind) -> EntitySummary {
    EntitySummary {
      kind,
      uid: self.uid,
      name: self.name,
      url: self.url,
    }
  }
}

// ============================================================================
// Catalog detail endpoint: GET /{type}/{uid}
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiDetailResponse {
  pub result: Option<ApiDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiDetail {
  #[serde(default, deserialize_with = "deserialize_optional_uid")]
  pub uid: Option<String>,
  pub description: Option<String>,
  // Values are mostly strings, but keep anything the API sends
  pub properties: Option<BTreeMap<String, Value>>,
}

fn deserialize_optional_uid<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  struct Wrapper(#[serde(deserialize_with = "deserialize_uid")] String);

  Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(uid)| uid))
}

impl ApiDetailResponse {
  /// Build the domain record, falling back to the requested uid and empty fields.
  pub fn into_detail(self, requested_uid: &str) -> EntityDetail {
    let result = self.result.unwrap_or_default();

    let properties = result
      .properties
      .unwrap_or_default()
      .into_iter()
      .map(|(key, value)| (key, property_text(value)))
      .collect();

    EntityDetail {
      uid: result
        .uid
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| requested_uid.to_string()),
      description: result.description.unwrap_or_default(),
      properties,
    }
  }
}

fn property_text(value: Value) -> String {
  match value {
    Value::String(s) => s,
    other => other.to_string(),
  }
}

// ============================================================================
// Favorites backend
// ============================================================================

/// Entry of GET /users/favorites. The type tag is kept raw so unknown
/// tags can be dropped instead of failing the whole list.
#[derive(Debug, Deserialize)]
pub struct ApiFavorite {
  #[serde(rename = "type")]
  pub tag: String,
  #[serde(deserialize_with = "deserialize_uid")]
  pub uid: String,
  #[serde(default, deserialize_with = "deserialize_nullable_string")]
  pub name: String,
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode favorites entry by entry, skipping the ones that are malformed.
pub fn parse_favorites(entries: Vec<Value>) -> Vec<ApiFavorite> {
  entries
    .into_iter()
    .filter_map(|entry| match serde_json::from_value::<ApiFavorite>(entry) {
      Ok(fav) => Some(fav),
      Err(e) => {
        debug!(error = %e, "skipping malformed favorite");
        None
      }
    })
    .collect()
}

/// Body of POST /favorite/{tag}/{uid}
#[derive(Debug, Serialize)]
pub struct ApiFavoriteBody<'a> {
  pub name: &'a str,
}

/// Body of the list-sync endpoints (POST /people, POST /planets)
#[derive(Debug, Serialize)]
pub struct ApiSyncItem<'a> {
  pub uid: &'a str,
  pub name: &'a str,
}
