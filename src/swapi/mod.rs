//! Remote clients: the read-only catalog and the favorites backend.

pub mod api_types;
pub mod backend;
pub mod client;
pub mod error;
pub mod types;

pub use backend::FavoritesClient;
pub use client::CatalogClient;
pub use error::ApiError;
pub use types::{EntityDetail, EntityKind, EntitySummary, FavoriteRecord};
