//! Observability for errors the store deliberately swallows.

use std::fmt;
use std::sync::Arc;

use super::storage::PersistenceError;
use crate::swapi::EntityKind;

/// An error that was handled silently.
#[derive(Debug)]
pub enum SwallowedError {
  /// Reading or writing local state failed
  Persistence(PersistenceError),
  /// One item of a list sync was not accepted by the backend
  SyncItem {
    kind: EntityKind,
    uid: String,
    reason: String,
  },
}

impl fmt::Display for SwallowedError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SwallowedError::Persistence(e) => write!(f, "persistence: {}", e),
      SwallowedError::SyncItem { kind, uid, reason } => {
        write!(f, "sync {} {}: {}", kind, uid, reason)
      }
    }
  }
}

/// Callback invoked for every swallowed error.
pub type ErrorHook = Arc<dyn Fn(&SwallowedError) + Send + Sync>;

/// Log a swallowed error and forward it to the hook, if any.
pub(crate) fn report(hook: Option<&ErrorHook>, error: SwallowedError) {
  tracing::warn!(%error, "ignored error");
  if let Some(hook) = hook {
    hook(&error);
  }
}
