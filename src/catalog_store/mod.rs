mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{AudioStatus, Track};
pub use schema::migrate_if_needed;
pub use store::SqliteCatalogStore;
pub use trait_def::{CatalogStore, TrackFilter};
