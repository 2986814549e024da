use crate::swapi::api_types::{ApiDetailResponse, ApiListResponse};
use crate::swapi::error::{ApiError, ApiResult};
use crate::swapi::types::{EntityDetail, EntityKind, EntitySummary};
use color_eyre::{eyre::eyre, Result};
use tracing::debug;

/// Read-only client for the public catalog API
#[derive(Clone)]
pub struct CatalogClient {
  http: reqwest::Client,
  base_url: String,
}

impl CatalogClient {
  pub fn new(base_url: &str) -> Result<Self> {
    let http = reqwest::Client::builder()
      .build()
      .map_err(|e| eyre!("Failed to create catalog client: {}", e))?;

    Ok(Self {
      http,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  /// Get the list of entities for a kind
  pub async fn fetch_list(&self, kind: EntityKind) -> ApiResult<Vec<EntitySummary>> {
    let url = format!("{}/{}", self.base_url, kind);
    let target = kind.to_string();
    debug!(%url, "fetching list");

    let response = self
      .http
      .get(&url)
      .send()
      .await
      .map_err(|e| ApiError::fetch(&target, e))?;

    let status = response.status();
    if !status.is_success() {
      return Err(ApiError::fetch(target, status));
    }

    let body: ApiListResponse = response
      .json()
      .await
      .map_err(|e| ApiError::fetch(&target, e))?;

    Ok(
      body
        .results
        .into_iter()
        .map(|item| item.into_summary(kind))
        .collect(),
    )
  }

  /// Get a single entity record
  pub async fn fetch_detail(&self, kind: EntityKind, uid: &str) -> ApiResult<EntityDetail> {
    let url = format!("{}/{}/{}", self.base_url, kind, uid);
    let target = format!("{} {}", kind, uid);
    debug!(%url, "fetching detail");

    let response = self
      .http
      .get(&url)
      .send()
      .await
      .map_err(|e| ApiError::fetch(&target, e))?;

    let status = response.status();
    if !status.is_success() {
      return Err(ApiError::fetch(target, status));
    }

    let body: ApiDetailResponse = response
      .json()
      .await
      .map_err(|e| ApiError::fetch(&target, e))?;

    Ok(body.into_detail(uid))
  }
}
