//! Response cache for the Backoffice server.
//!
//! This module provides a cache-aside layer in front of the partner
//! configuration endpoints, backed by any [`backoffice_store::KeyValueStore`],
//! with credential-aware key derivation, pattern-based invalidation,
//! and metrics.

pub mod intercept;
pub mod invalidation;
pub mod keys;
pub mod routes;
pub mod service;
pub mod store_layer;

// Re-exports
pub use intercept::{
    CacheLayerState, CacheOutcome, DEFAULT_MAX_BODY_BYTES, cache_interceptor, persist_response,
};
pub use invalidation::InvalidationResult;
pub use keys::{
    AuthorizationKeyStrategy, CacheKey, CompositeKeyStrategy, KeyStrategy, KeyStrategyKind,
    PARTNER_ID_HEADER, RequestKeyParts,
};
pub use routes::{CacheRoutes, PARTNER_CONFIG_ITEM_PATH, PARTNER_CONFIG_PATH};
pub use service::ResponseCache;
pub use store_layer::{StoreResponseLayer, StoreResponseMiddleware};
