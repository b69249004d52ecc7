//! Redis store backend.
//!
//! Uses `redis::aio::ConnectionManager` for async multiplexed connections
//! with automatic reconnection. Every command is bounded by the configured
//! operation timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// Redis-backed key-value store.
///
/// Cloning is cheap: clones share the same multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    default_ttl: Duration,
    scan_batch_size: usize,
    operation_timeout: Duration,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("connection", &"ConnectionManager")
            .field("default_ttl", &self.default_ttl)
            .field("scan_batch_size", &self.scan_batch_size)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

impl RedisStore {
    /// Connects to Redis using the given configuration.
    ///
    /// # Errors
    ///
    /// `StoreError::Unavailable` if the client cannot be created or the
    /// initial connection fails, `StoreError::Timeout` if it takes longer
    /// than the connect timeout.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let client = redis::Client::open(config.redis_url().as_str()).map_err(|e| {
            StoreError::unavailable(format!("failed to create Redis client: {e}"))
        })?;

        let connection = tokio::time::timeout(
            config.connect_timeout(),
            ConnectionManager::new(client),
        )
        .await
        .map_err(|_| StoreError::Timeout {
            operation: "CONNECT",
            millis: config.connect_timeout_ms,
        })?
        .map_err(|e| StoreError::unavailable(format!("failed to connect to Redis: {e}")))?;

        debug!(url = %config.redacted_url(), "Redis store connected");

        Ok(Self {
            connection,
            default_ttl: config.default_ttl(),
            scan_batch_size: config.scan_batch_size,
            operation_timeout: config.operation_timeout(),
        })
    }

    /// Runs a single command future under the operation timeout.
    async fn run<T, F>(&self, operation: &'static str, command: F) -> StoreResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, command).await {
            Ok(result) => result.map_err(|e| StoreError::from_redis(operation, e)),
            Err(_) => Err(StoreError::Timeout {
                operation,
                millis: self.operation_timeout.as_millis() as u64,
            }),
        }
    }

    /// Fetches one SCAN page. A returned cursor of 0 ends the iteration.
    ///
    /// Keys come back as raw bytes: a shared database may hold keys that are
    /// not UTF-8, and those must still be deletable.
    async fn scan_page(&self, cursor: u64, pattern: &str) -> StoreResult<(u64, Vec<Vec<u8>>)> {
        let mut conn = self.connection.clone();
        self.run(
            "SCAN",
            redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(self.scan_batch_size)
                .query_async(&mut conn),
        )
        .await
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = self
            .run("GET", redis::cmd("GET").arg(key).query_async(&mut conn))
            .await?;

        debug!(hit = value.is_some(), "Redis GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        let ttl = ttl.unwrap_or(self.default_ttl);

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if !ttl.is_zero() {
            // EX no acepta 0; redondeamos hacia arriba a 1s
            cmd.arg("EX").arg(ttl.as_secs().max(1));
        }

        self.run::<(), _>("SET", cmd.query_async(&mut conn)).await?;

        debug!(bytes = value.len(), ttl_seconds = ttl.as_secs(), "Redis SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.connection.clone();
        let removed: u64 = self
            .run("DEL", redis::cmd("DEL").arg(key).query_async(&mut conn))
            .await?;

        debug!(removed = removed, "Redis DEL");
        Ok(removed > 0)
    }

    async fn delete_matching(&self, pattern: &str) -> StoreResult<u64> {
        let mut conn = self.connection.clone();
        let mut deleted: u64 = 0;
        let mut cursor: u64 = 0;

        // SCAN en lotes para no bloquear el servidor
        loop {
            let (next_cursor, keys) = self.scan_page(cursor, pattern).await?;

            if !keys.is_empty() {
                let count: u64 = self
                    .run("DEL", redis::cmd("DEL").arg(&keys).query_async(&mut conn))
                    .await?;
                deleted += count;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(pattern = pattern, deleted = deleted, "Redis pattern DEL");
        Ok(deleted)
    }

    async fn list_matching(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let mut found = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next_cursor, keys) = self.scan_page(cursor, pattern).await?;
            // Las keys no UTF-8 no son nuestras; se omiten del listado
            found.extend(keys.into_iter().filter_map(|key| String::from_utf8(key).ok()));

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        // SCAN puede devolver duplicados si hay rehash durante la iteracion
        found.sort();
        found.dedup();
        Ok(found)
    }

    async fn flush_all(&self) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        self.run::<(), _>("FLUSHDB", redis::cmd("FLUSHDB").query_async(&mut conn))
            .await?;

        debug!("Redis FLUSHDB");
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        let pong: String = self
            .run("PING", redis::cmd("PING").query_async(&mut conn))
            .await?;

        if pong == "PONG" {
            Ok(())
        } else {
            Err(StoreError::backend("PING", format!("unexpected reply '{pong}'")))
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
