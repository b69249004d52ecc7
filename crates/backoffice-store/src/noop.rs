//! Store that never holds anything.
//!
//! Used when caching is disabled or when the configured backend cannot be
//! reached at startup: every read misses, every write succeeds silently.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::traits::KeyValueStore;

/// No-op key-value store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl NoopStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyValueStore for NoopStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> StoreResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> StoreResult<bool> {
        Ok(false)
    }

    async fn delete_matching(&self, _pattern: &str) -> StoreResult<u64> {
        Ok(0)
    }

    async fn list_matching(&self, _pattern: &str) -> StoreResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn flush_all(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "noop"
    }
}
