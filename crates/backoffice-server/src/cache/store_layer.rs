//! Write-only response caching for individual routes.
//!
//! [`StoreResponseLayer`] never serves from the cache: it lets the request
//! through and stores a successful JSON response under the key produced by
//! its own [`KeyStrategy`]. Attach it with `route_layer` to the handlers
//! whose output should be recorded, e.g. under the bare authorization key.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{Request, Response},
};
use tower::{Layer, Service};

use crate::cache::intercept::{DEFAULT_MAX_BODY_BYTES, persist_response};
use crate::cache::{KeyStrategy, RequestKeyParts, ResponseCache};

/// Layer that stores handler responses after they succeed.
#[derive(Debug, Clone)]
pub struct StoreResponseLayer {
    cache: ResponseCache,
    strategy: Arc<dyn KeyStrategy>,
    max_body_bytes: usize,
}

impl StoreResponseLayer {
    pub fn new(cache: ResponseCache, strategy: Arc<dyn KeyStrategy>) -> Self {
        Self {
            cache,
            strategy,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

impl<S> Layer<S> for StoreResponseLayer {
    type Service = StoreResponseMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        StoreResponseMiddleware {
            inner,
            layer: self.clone(),
        }
    }
}

/// Middleware created by [`StoreResponseLayer`].
#[derive(Debug, Clone)]
pub struct StoreResponseMiddleware<S> {
    inner: S,
    layer: StoreResponseLayer,
}

impl<S> Service<Request<Body>> for StoreResponseMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // La key se deriva antes de consumir el request
        let key = self
            .layer
            .strategy
            .derive(&RequestKeyParts::from_request(&request));
        let layer = self.layer.clone();

        let mut inner = self.inner.clone();

        Box::pin(async move {
            let response = inner.call(request).await?;

            match key {
                Some(key) => {
                    Ok(persist_response(&layer.cache, &key, response, layer.max_body_bytes).await)
                },
                None => Ok(response),
            }
        })
    }
}
