//! Shared handle to the current snapshot.

use std::sync::{Arc, Mutex, MutexGuard};

use super::snapshot::StoreSnapshot;

/// Owner of the current `StoreSnapshot`.
///
/// Readers get an `Arc` to an immutable snapshot; writers replace it wholesale.
/// The lock only guards a single read-modify-write step and is never held
/// across an await, so operations that suspend between reading and writing
/// race with last-write-wins semantics.
#[derive(Clone, Default)]
pub struct StateCell {
  current: Arc<Mutex<Arc<StoreSnapshot>>>,
}

impl StateCell {
  pub fn new(snapshot: StoreSnapshot) -> Self {
    Self {
      current: Arc::new(Mutex::new(Arc::new(snapshot))),
    }
  }

  /// Current snapshot.
  pub fn get(&self) -> Arc<StoreSnapshot> {
    Arc::clone(&self.lock())
  }

  /// Copy the latest snapshot, apply `f`, and store the result. Returns the new snapshot.
  pub fn update<F>(&self, f: F) -> Arc<StoreSnapshot>
  where
    F: FnOnce(&mut StoreSnapshot),
  {
    let mut guard = self.lock();
    let mut next = StoreSnapshot::clone(&guard);
    f(&mut next);
    let next = Arc::new(next);
    *guard = Arc::clone(&next);
    next
  }

  fn lock(&self) -> MutexGuard<'_, Arc<StoreSnapshot>> {
    // A panic inside `update` never stores a partial snapshot.
    self
      .current
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}
