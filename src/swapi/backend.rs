use crate::swapi::api_types::{parse_favorites, ApiFavorite, ApiFavoriteBody, ApiSyncItem};
use crate::swapi::error::{ApiError, ApiResult};
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use tracing::debug;

/// Header carrying the caller's numeric id on every backend request
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Client for the favorites backend, scoped to one user id
#[derive(Clone)]
pub struct FavoritesClient {
  http: reqwest::Client,
  base_url: String,
}

impl FavoritesClient {
  pub fn new(base_url: &str, user_id: u64) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_ID_HEADER, HeaderValue::from(user_id));

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .build()
      .map_err(|e| eyre!("Failed to create backend client: {}", e))?;

    Ok(Self {
      http,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  /// Get every favorite the backend holds for this user.
  ///
  /// Malformed entries are dropped; only a body that is not a JSON array
  /// fails the call.
  pub async fn list_favorites(&self) -> ApiResult<Vec<ApiFavorite>> {
    let url = format!("{}/users/favorites", self.base_url);
    debug!(%url, "listing favorites");

    let response = ensure_success(self.http.get(&url).send().await?).await?;
    let entries: Vec<serde_json::Value> = response.json().await?;
    Ok(parse_favorites(entries))
  }

  /// Create or update a favorite
  pub async fn add_favorite(&self, tag: &str, uid: &str, name: &str) -> ApiResult<()> {
    let url = format!("{}/favorite/{}/{}", self.base_url, tag, uid);
    debug!(%url, "adding favorite");

    let response = self
      .http
      .post(&url)
      .json(&ApiFavoriteBody { name })
      .send()
      .await?;
    ensure_success(response).await?;
    Ok(())
  }

  pub async fn remove_favorite(&self, tag: &str, uid: &str) -> ApiResult<()> {
    let url = format!("{}/favorite/{}/{}", self.base_url, tag, uid);
    debug!(%url, "removing favorite");

    ensure_success(self.http.delete(&url).send().await?).await?;
    Ok(())
  }

  /// Push one list item into a backend collection.
  ///
  /// Returns the raw status; deciding which statuses count as accepted is
  /// left to the caller.
  pub async fn upsert_item(&self, collection: &str, uid: &str, name: &str) -> ApiResult<StatusCode> {
    let url = format!("{}/{}", self.base_url, collection);

    let response = self
      .http
      .post(&url)
      .json(&ApiSyncItem { uid, name })
      .send()
      .await?;
    Ok(response.status())
  }
}

/// Turn a non-success response into `ApiError::Backend` with its body text.
async fn ensure_success(response: Response) -> ApiResult<Response> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let body = response
    .text()
    .await
    .unwrap_or_else(|_| "Unknown error".to_string());
  Err(ApiError::Backend {
    status: status.as_u16(),
    body,
  })
}
