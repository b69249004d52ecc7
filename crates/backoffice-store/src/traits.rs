//! Key-value store trait definition.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreResult;

/// A flat key-value store holding byte values with optional expiration.
///
/// Implementations must be safe to share between concurrent request
/// handlers; individual operations are serialized by the backend and no
/// client-side locking is expected from callers.
///
/// # Implementors
///
/// - `RedisStore` - Redis over a multiplexed, auto-reconnecting connection
/// - `MemoryStore` - in-process store with Redis-like glob semantics
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetches the raw value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// `ttl = None` applies the store's configured default expiration.
    /// A zero duration stores the value without expiration.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> StoreResult<()>;

    /// Removes a single key. Returns true if it existed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Removes every key matching a glob pattern (`*`, `?`, `[...]`).
    ///
    /// Keys are visited in bounded batches so that large keyspaces never
    /// trigger a single blocking operation. Deletion order is unspecified and
    /// keys written concurrently may or may not be included.
    ///
    /// Returns the number of keys removed.
    async fn delete_matching(&self, pattern: &str) -> StoreResult<u64>;

    /// For each suffix, removes every key matching `prefix + suffix + "*"`.
    ///
    /// Used to drop a family of related entries, e.g. every cached response
    /// under a set of URIs for a given partner.
    async fn delete_matching_with_suffixes(
        &self,
        prefix: &str,
        suffixes: &[String],
    ) -> StoreResult<u64> {
        let mut deleted = 0;
        for suffix in suffixes {
            deleted += self
                .delete_matching(&format!("{prefix}{suffix}*"))
                .await?;
        }
        Ok(deleted)
    }

    /// Lists the keys matching a glob pattern. Diagnostic use only.
    async fn list_matching(&self, pattern: &str) -> StoreResult<Vec<String>>;

    /// Removes every entry in the store. Irreversible; meant for test isolation.
    async fn flush_all(&self) -> StoreResult<()>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name used in logs and health output.
    fn backend_name(&self) -> &'static str;
}
