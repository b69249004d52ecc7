//! Application state.

use std::sync::Arc;

use backoffice_core::{ApiKeyStore, InMemoryApiKeyStore, PartnerConfigRepository};
use backoffice_store::KeyValueStore;

use crate::cache::{CacheLayerState, CacheRoutes, ResponseCache};
use crate::settings::CacheSettings;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistencia de partner configs.
    repository: Arc<dyn PartnerConfigRepository>,
    /// Claves de servicio aprovisionadas.
    api_keys: Arc<dyn ApiKeyStore>,
    /// Cache de respuestas y su politica.
    cache_layer: CacheLayerState,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn PartnerConfigRepository>,
        api_keys: Arc<dyn ApiKeyStore>,
        cache_layer: CacheLayerState,
    ) -> Self {
        Self {
            repository,
            api_keys,
            cache_layer,
        }
    }

    /// Builds the state from loaded settings and a connected store.
    pub fn from_settings(
        repository: Arc<dyn PartnerConfigRepository>,
        settings: &crate::settings::Settings,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let api_keys = InMemoryApiKeyStore::with_keys(settings.auth.service_keys.iter().cloned());

        Self::new(
            repository,
            Arc::new(api_keys),
            cache_layer_from_settings(&settings.cache, store),
        )
    }

    pub fn repository(&self) -> &dyn PartnerConfigRepository {
        self.repository.as_ref()
    }

    pub fn api_keys(&self) -> &dyn ApiKeyStore {
        self.api_keys.as_ref()
    }

    /// Shared handle for the authentication middleware.
    pub fn api_key_store(&self) -> Arc<dyn ApiKeyStore> {
        Arc::clone(&self.api_keys)
    }

    pub fn cache(&self) -> &ResponseCache {
        self.cache_layer.cache()
    }

    pub fn cache_layer(&self) -> &CacheLayerState {
        &self.cache_layer
    }
}

fn cache_layer_from_settings(
    settings: &CacheSettings,
    store: Arc<dyn KeyValueStore>,
) -> CacheLayerState {
    CacheLayerState::new(ResponseCache::new(store))
        .with_routes(CacheRoutes::partner_config())
        .with_strategy(settings.key_strategy.build())
        .with_max_body_bytes(settings.max_body_bytes)
        .with_enabled(settings.enabled)
}
