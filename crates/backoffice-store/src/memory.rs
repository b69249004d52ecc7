//! In-process store backend using Moka.
//!
//! Mirrors the Redis semantics the response cache relies on: per-entry TTL,
//! overwrite on set, and `SCAN ... MATCH` pattern semantics via [`KeyPattern`]. State is NOT shared between
//! processes, so it is meant for tests and single-instance development.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::pattern::KeyPattern;
use crate::traits::KeyValueStore;

/// Valor almacenado junto con su TTL efectivo.
#[derive(Debug, Clone)]
struct Entry {
    value: Arc<[u8]>,
    ttl: Option<Duration>,
}

/// Expiracion por entry: cada set reinicia el TTL, igual que `SET ... EX`.
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// In-memory key-value store.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("max_capacity", &self.inner.policy().max_capacity())
            .field("entry_count", &self.inner.entry_count())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl MemoryStore {
    /// Creates a store from configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.memory_max_capacity, config.default_ttl())
    }

    /// Creates a store with the given capacity and default TTL.
    /// A zero default TTL keeps entries until they are deleted or evicted.
    pub fn new(max_capacity: u64, default_ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        debug!(
            max_capacity = max_capacity,
            ttl_seconds = default_ttl.as_secs(),
            "In-memory store created"
        );

        Self { inner, default_ttl }
    }

    /// Numero aproximado de entries (tras procesar tareas pendientes).
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    fn matching_keys(&self, pattern: &KeyPattern) -> Vec<String> {
        self.inner
            .iter()
            .filter(|(key, _)| pattern.matches(key))
            .map(|(key, _)| (*key).clone())
            .collect()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let value = self.inner.get(key).await.map(|entry| entry.value.to_vec());

        debug!(hit = value.is_some(), "Memory GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> StoreResult<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = Entry {
            value: Arc::from(value),
            ttl: (!ttl.is_zero()).then_some(ttl),
        };

        self.inner.insert(key.to_string(), entry).await;

        debug!(bytes = value.len(), ttl_seconds = ttl.as_secs(), "Memory SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let removed = self.inner.remove(key).await.is_some();

        debug!(removed = removed, "Memory DEL");
        Ok(removed)
    }

    async fn delete_matching(&self, pattern: &str) -> StoreResult<u64> {
        let compiled = KeyPattern::new(pattern)?;

        let mut deleted: u64 = 0;
        for key in self.matching_keys(&compiled) {
            if self.inner.remove(&key).await.is_some() {
                deleted += 1;
            }
        }

        debug!(pattern = pattern, deleted = deleted, "Memory pattern DEL");
        Ok(deleted)
    }

    async fn list_matching(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let compiled = KeyPattern::new(pattern)?;

        let mut keys = self.matching_keys(&compiled);
        keys.sort();
        Ok(keys)
    }

    async fn flush_all(&self) -> StoreResult<()> {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;

        debug!("Memory FLUSH");
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        // In-memory store is always reachable
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
