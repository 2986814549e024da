//! Client-side state, cache and sync layer.
//!
//! This module owns the application snapshot and everything that changes it:
//! - Loads catalog lists and detail records, caching them in the snapshot
//! - Keeps favorites, locally for some kinds and through the backend for others
//! - Persists a projection of the snapshot to local storage
//! - Mirrors fetched lists into the backend on a best-effort basis

mod actions;
pub mod hooks;
pub mod persist;
pub mod policy;
pub mod snapshot;
pub mod state;
pub mod storage;
pub mod sync;

pub use actions::Store;
pub use hooks::{ErrorHook, SwallowedError};
pub use snapshot::StoreSnapshot;
pub use storage::SqliteStorage;
