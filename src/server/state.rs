use axum::extract::FromRef;
use std::sync::Arc;

use crate::catalog_store::CatalogStore;
use crate::storage::AudioBackend;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedAudioBackend = Arc<dyn AudioBackend>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub catalog_store: GuardedCatalogStore,
    pub audio_backend: GuardedAudioBackend,
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedAudioBackend {
    fn from_ref(input: &ServerState) -> Self {
        input.audio_backend.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
