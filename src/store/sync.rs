//! Best-effort mirroring of fetched lists into the favorites backend.

use reqwest::StatusCode;
use tracing::{debug, info};

use super::hooks::{report, ErrorHook, SwallowedError};
use super::policy::{KindPolicy, ListSync};
use super::state::StateCell;
use crate::swapi::{EntityKind, EntitySummary, FavoritesClient};

/// Statuses the list endpoints answer with when an item is stored or already exists.
fn is_accepted(status: StatusCode) -> bool {
  matches!(
    status,
    StatusCode::OK | StatusCode::CREATED | StatusCode::CONFLICT
  )
}

/// Outcome of one sync batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
  pub accepted: usize,
  pub failed: usize,
}

#[derive(Clone)]
pub struct SyncOrchestrator {
  backend: FavoritesClient,
  state: StateCell,
  on_error: Option<ErrorHook>,
}

impl SyncOrchestrator {
  pub fn new(backend: FavoritesClient, state: StateCell) -> Self {
    Self {
      backend,
      state,
      on_error: None,
    }
  }

  pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
    self.on_error = Some(hook);
    self
  }

  /// Upsert every item into the backend collection for `kind`, one at a time.
  ///
  /// Kinds without a backend collection are skipped. Per-item failures are
  /// reported to the error hook and never abort the batch or touch the
  /// snapshot's error field.
  pub async fn sync_list(&self, kind: EntityKind, items: &[EntitySummary]) -> SyncReport {
    let collection = match KindPolicy::for_kind(kind).sync {
      ListSync::Upsert { collection } => collection,
      ListSync::None => return SyncReport::default(),
    };

    self.state.update(|s| s.loading.syncing = true);
    debug!(%kind, count = items.len(), "syncing list to backend");

    let mut outcome = SyncReport::default();
    for item in items {
      let reason = match self
        .backend
        .upsert_item(collection, &item.uid, &item.name)
        .await
      {
        Ok(status) if is_accepted(status) => {
          outcome.accepted += 1;
          continue;
        }
        Ok(status) => format!("unexpected status {}", status),
        Err(e) => e.to_string(),
      };

      outcome.failed += 1;
      report(
        self.on_error.as_ref(),
        SwallowedError::SyncItem {
          kind,
          uid: item.uid.clone(),
          reason,
        },
      );
    }

    self.state.update(|s| s.loading.syncing = false);
    info!(%kind, accepted = outcome.accepted, failed = outcome.failed, "list sync finished");

    outcome
  }
}
