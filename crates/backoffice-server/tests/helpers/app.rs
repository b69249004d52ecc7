//! Application fixtures: in-memory store, counting repository, failing store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use backoffice_core::{
    InMemoryApiKeyStore, InMemoryPartnerRepository, NewPartnerConfig, PartnerConfig,
    PartnerConfigPatch, PartnerConfigRepository, ServiceApiKey,
};
use backoffice_server::cache::{CacheLayerState, ResponseCache};
use backoffice_server::{AppState, create_app};
use backoffice_store::{KeyValueStore, MemoryStore, StoreError, StoreResult};

use super::client::TestClient;

/// Clave de servicio aprovisionada en todas las apps de test.
pub const SERVICE_KEY: &str = "tok123";
pub const OTHER_SERVICE_KEY: &str = "tok456";

/// Repository that counts reads, so tests can tell whether a handler ran.
#[derive(Debug, Default)]
pub struct CountingRepository {
    inner: InMemoryPartnerRepository,
    reads: AtomicUsize,
}

impl CountingRepository {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PartnerConfigRepository for CountingRepository {
    async fn list(&self) -> backoffice_core::Result<Vec<PartnerConfig>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.list().await
    }

    async fn get(&self, id: u64) -> backoffice_core::Result<PartnerConfig> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn create(&self, input: NewPartnerConfig) -> backoffice_core::Result<PartnerConfig> {
        self.inner.create(input).await
    }

    async fn replace(
        &self,
        id: u64,
        input: NewPartnerConfig,
    ) -> backoffice_core::Result<PartnerConfig> {
        self.inner.replace(id, input).await
    }

    async fn update(
        &self,
        id: u64,
        patch: PartnerConfigPatch,
    ) -> backoffice_core::Result<PartnerConfig> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: u64) -> backoffice_core::Result<()> {
        self.inner.delete(id).await
    }
}

/// Store whose every operation fails as if Redis were down.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> StoreResult<()> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn delete(&self, _key: &str) -> StoreResult<bool> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn delete_matching(&self, _pattern: &str) -> StoreResult<u64> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn list_matching(&self, _pattern: &str) -> StoreResult<Vec<String>> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn flush_all(&self) -> StoreResult<()> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::unavailable("connection refused"))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Full application wired with in-memory collaborators.
pub struct TestApp {
    pub client: TestClient,
    pub store: Arc<dyn KeyValueStore>,
    pub repository: Arc<CountingRepository>,
    pub state: AppState,
}

impl TestApp {
    /// App backed by a fresh `MemoryStore`.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new(10_000, Duration::from_secs(60))))
    }

    /// App backed by `FailingStore`.
    pub fn with_failing_store() -> Self {
        Self::with_store(Arc::new(FailingStore))
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let repository = Arc::new(CountingRepository::default());
        let api_keys = InMemoryApiKeyStore::with_keys([
            ServiceApiKey::new("billing", SERVICE_KEY),
            ServiceApiKey::new("reporting", OTHER_SERVICE_KEY),
        ]);

        let state = AppState::new(
            repository.clone(),
            Arc::new(api_keys),
            CacheLayerState::new(ResponseCache::new(store.clone())),
        );

        Self {
            client: TestClient::new(create_app(state.clone())),
            store,
            repository,
            state,
        }
    }

    /// Creates a partner config directly in the repository (no HTTP, no invalidation).
    pub async fn seed(&self, name: &str, description: &str) -> PartnerConfig {
        self.repository
            .create(NewPartnerConfig::new(name, description))
            .await
            .expect("seed failed")
    }

    /// All keys currently held by the store.
    pub async fn stored_keys(&self) -> Vec<String> {
        self.store.list_matching("*").await.expect("list failed")
    }
}

/// Headers con solo la clave de servicio.
pub fn auth() -> [(&'static str, &'static str); 1] {
    [("authorization", SERVICE_KEY)]
}
