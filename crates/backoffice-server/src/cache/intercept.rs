//! Request interception: serve from cache or run the handler and store.
//!
//! Each request ends in one of two states. Either it is answered from the
//! store without reaching the handler, or it passes through and, for a
//! cacheable route, the handler's JSON body is written back under the
//! request's key. Store failures never change the response.

use std::sync::Arc;

use axum::{
    Json,
    body::{Body, HttpBody},
    extract::{MatchedPath, State},
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{
    CacheKey, CacheRoutes, CompositeKeyStrategy, KeyStrategy, RequestKeyParts, ResponseCache,
};

/// Tamano maximo por defecto de un body cacheable (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// State consumed by [`cache_interceptor`].
#[derive(Debug, Clone)]
pub struct CacheLayerState {
    cache: ResponseCache,
    routes: Arc<CacheRoutes>,
    strategy: Arc<dyn KeyStrategy>,
    max_body_bytes: usize,
    enabled: bool,
}

impl CacheLayerState {
    /// Partner configuration routes, composite keys, 1 MiB body limit.
    pub fn new(cache: ResponseCache) -> Self {
        Self {
            cache,
            routes: Arc::new(CacheRoutes::partner_config()),
            strategy: Arc::new(CompositeKeyStrategy),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            enabled: true,
        }
    }

    pub fn with_routes(mut self, routes: CacheRoutes) -> Self {
        self.routes = Arc::new(routes);
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn KeyStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Disabled state lets every request through untouched.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

/// Como termino una request en la capa de cache.
///
/// Attached as a response extension by [`cache_interceptor`] on cacheable
/// routes so that outer layers (HTTP metrics) can label the request.
/// Routes outside the cache table carry no outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Answered from the store.
    Hit,
    /// Handler ran; its response was offered to the store.
    Miss,
    /// Cacheable route, but the request had no key material.
    Bypass,
}

impl CacheOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Bypass => "bypass",
        }
    }
}

fn with_outcome(mut response: Response, outcome: CacheOutcome) -> Response {
    response.extensions_mut().insert(outcome);
    response
}

/// Middleware de cache-aside para las rutas marcadas en [`CacheRoutes`].
///
/// Must be added with `Router::layer` so that `MatchedPath` is available.
/// Requests without a matched route are never cached.
pub async fn cache_interceptor(
    State(layer): State<CacheLayerState>,
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !layer.enabled {
        return next.run(request).await;
    }

    let cacheable = matched_path
        .as_ref()
        .is_some_and(|route| layer.routes.is_cacheable(request.method(), route.as_str()));
    if !cacheable {
        return next.run(request).await;
    }

    let parts = RequestKeyParts::from_request(&request);
    let Some(key) = layer.strategy.derive(&parts) else {
        debug!(path = %parts.path, "No cache key material, passing through");
        return with_outcome(next.run(request).await, CacheOutcome::Bypass);
    };

    if let Some(value) = layer.cache.get_response(&key).await {
        let response = cached_response(value, parts.origin.as_deref());
        return with_outcome(response, CacheOutcome::Hit);
    }

    let response = next.run(request).await;
    let response = persist_response(&layer.cache, &key, response, layer.max_body_bytes).await;
    with_outcome(response, CacheOutcome::Miss)
}

/// Builds the response served on a hit.
///
/// The request origin, if any, is echoed back in
/// `access-control-allow-origin` because the handler stack that would
/// normally add it never runs.
pub fn cached_response(value: Value, origin: Option<&str>) -> Response {
    let mut response = Json(value).into_response();

    if let Some(origin) = origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    response
}

/// Stores a successful JSON response under `key` and hands it back.
///
/// Only 2xx responses whose body has a known length up to
/// `max_body_bytes` are buffered; anything else is returned as is. A body
/// that is not a JSON object or array is returned without being stored.
/// If the body fails while buffering, the handler's status and headers are
/// kept and the body is dropped.
pub async fn persist_response(
    cache: &ResponseCache,
    key: &CacheKey,
    response: Response,
    max_body_bytes: usize,
) -> Response {
    if !response.status().is_success() {
        return response;
    }

    let fits = response
        .body()
        .size_hint()
        .upper()
        .is_some_and(|len| len <= max_body_bytes as u64);
    if !fits {
        debug!("Response body too large or unbounded, not cached");
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(status = %parts.status, error = %e, "Failed to buffer response body");
            parts.headers.remove(header::CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        },
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => {
            cache.set_response(key, &value).await;
        },
        Err(_) => debug!("Response body is not JSON, not cached"),
    }

    Response::from_parts(parts, Body::from(bytes))
}
