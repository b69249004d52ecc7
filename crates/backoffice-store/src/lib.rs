//! # Backoffice Store
//!
//! Key-value store adapters backing the Backoffice response cache.
//!
//! ## Features
//!
//! - Async, object-safe [`KeyValueStore`] trait shared by all backends
//! - Redis backend over an auto-reconnecting multiplexed connection
//! - In-memory backend with Redis-compatible pattern matching for tests and development
//! - No-op backend for running with caching disabled
//! - Batched SCAN-based pattern deletion and per-command timeouts
//!
//! ## Example
//!
//! ```no_run
//! use backoffice_store::{StoreConfig, connect};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), backoffice_store::StoreError> {
//! let store = connect(&StoreConfig::default()).await?;
//! store.set("tok123", br#"{"results":[]}"#, None).await?;
//! let removed = store.delete_matching("tok*").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod noop;
pub mod pattern;
pub mod redis;
pub mod traits;

use std::sync::Arc;

use tracing::info;

// Re-exports
pub use config::{StoreBackend, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use noop::NoopStore;
pub use pattern::KeyPattern;
pub use self::redis::RedisStore;
pub use traits::KeyValueStore;

/// Builds the store selected by `config.backend`.
///
/// # Errors
///
/// Propagates connection failures from the Redis backend. The in-memory
/// backend never fails.
pub async fn connect(config: &StoreConfig) -> StoreResult<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StoreBackend::Redis => Arc::new(RedisStore::connect(config).await?),
        StoreBackend::Memory => Arc::new(MemoryStore::from_config(config)),
    };

    info!(
        backend = store.backend_name(),
        default_ttl_secs = config.default_ttl_secs,
        "Cache store ready"
    );

    Ok(store)
}
