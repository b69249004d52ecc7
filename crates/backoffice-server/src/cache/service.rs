//! Response cache on top of a key-value store.
//!
//! Wraps an [`Arc<dyn KeyValueStore>`] and speaks JSON: values go in as
//! `serde_json::Value` and come back out the same way. Every store failure is
//! absorbed here so that callers only ever see a hit, a miss, or a no-op.

use std::sync::Arc;
use std::time::Instant;

use backoffice_store::{KeyValueStore, StoreResult};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::keys::CacheKey;
use crate::metrics::CacheMetrics;

/// Cache de respuestas JSON.
/// Clonar es barato: los clones comparten store y metricas.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use backoffice_server::cache::{CacheKey, ResponseCache};
/// use backoffice_store::MemoryStore;
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = ResponseCache::new(Arc::new(MemoryStore::new(100, std::time::Duration::from_secs(60))));
/// let key = CacheKey::new("tok123");
///
/// cache.set_response(&key, &serde_json::json!({"results": []})).await;
/// assert!(cache.get_response(&key).await.is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
    metrics: CacheMetrics,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("backend", &self.store.backend_name())
            .field("hits", &self.metrics.hits())
            .field("misses", &self.metrics.misses())
            .finish()
    }
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            metrics: CacheMetrics::new(),
        }
    }

    /// Returns the previously stored response for `key`.
    ///
    /// Absent keys, unreachable stores and values that are not valid JSON
    /// all read as `None`.
    pub async fn get_response(&self, key: &CacheKey) -> Option<Value> {
        let start = Instant::now();
        let result = self.store.get(key.as_str()).await;
        self.metrics
            .record_operation_duration("get", start.elapsed());

        let raw = match result {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache miss");
                self.metrics.record_miss();
                return None;
            },
            Err(e) => {
                warn!(error = %e, "Cache read failed, treating as miss");
                self.metrics.record_store_error("get");
                self.metrics.record_miss();
                return None;
            },
        };

        match serde_json::from_slice::<Value>(&raw) {
            Ok(value) => {
                debug!("Cache hit");
                self.metrics.record_hit();
                Some(value)
            },
            Err(e) => {
                warn!(error = %e, "Discarding malformed cached value");
                self.metrics.record_miss();
                None
            },
        }
    }

    /// Stores `value` under `key` with the store's default TTL.
    ///
    /// Only JSON objects and arrays are stored. Returns whether the value
    /// was written; failures are logged and never propagated.
    pub async fn set_response(&self, key: &CacheKey, value: &Value) -> bool {
        if !(value.is_object() || value.is_array()) {
            debug!("Skipping non-structured response");
            return false;
        }

        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Failed to serialize response for cache");
                return false;
            },
        };

        let start = Instant::now();
        let result = self.store.set(key.as_str(), &bytes, None).await;
        self.metrics
            .record_operation_duration("set", start.elapsed());

        match result {
            Ok(()) => {
                debug!(bytes = bytes.len(), "Response cached");
                self.metrics.record_store();
                true
            },
            Err(e) => {
                warn!(error = %e, "Cache write failed");
                self.metrics.record_store_error("set");
                false
            },
        }
    }

    /// Removes a single key. Returns whether it existed.
    pub async fn invalidate(&self, key: &CacheKey) -> StoreResult<bool> {
        let removed = self.store.delete(key.as_str()).await.inspect_err(|_| {
            self.metrics.record_store_error("delete");
        })?;

        if removed {
            self.metrics.record_invalidated(1);
        }
        Ok(removed)
    }

    /// Lists keys matching a glob pattern. Diagnostic use.
    pub async fn keys_matching(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.store.list_matching(pattern).await
    }

    /// Wipes the whole store. Test isolation only, never from request paths.
    pub async fn flush_all(&self) -> StoreResult<()> {
        self.store.flush_all().await
    }

    /// True when the store answers a ping.
    pub async fn health(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(backend = self.store.backend_name(), error = %e, "Cache store unhealthy");
                false
            },
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub(crate) fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}
