//! HTTP metrics middleware.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

use crate::cache::CacheOutcome;

/// Label para rutas fuera de la tabla de cache.
const NO_CACHE_OUTCOME: &str = "none";

/// Middleware que registra metricas HTTP para cada request.
///
/// Usa la ruta matcheada (`/partner-config/{id}`) como label para no
/// disparar la cardinalidad con ids concretos. The `cache` label comes from
/// the [`CacheOutcome`] the interceptor leaves on the response, so this
/// layer must sit outside it.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let labels = RequestLabels {
        method,
        path,
        status: response.status().as_u16().to_string(),
        cache: cache_label(&response),
    };
    labels.record(start.elapsed().as_secs_f64());

    response
}

fn cache_label(response: &Response) -> &'static str {
    response
        .extensions()
        .get::<CacheOutcome>()
        .map_or(NO_CACHE_OUTCOME, |outcome| outcome.as_str())
}

struct RequestLabels {
    method: String,
    path: String,
    status: String,
    cache: &'static str,
}

impl RequestLabels {
    fn record(self, seconds: f64) {
        counter!(
            "backoffice_http_requests_total",
            "method" => self.method.clone(),
            "path" => self.path.clone(),
            "status" => self.status,
            "cache" => self.cache
        )
        .increment(1);

        histogram!(
            "backoffice_http_request_duration_seconds",
            "method" => self.method,
            "path" => self.path,
            "cache" => self.cache
        )
        .record(seconds);
    }
}

/// Registra las metricas HTTP
pub fn register_http_metrics() {
    metrics::describe_counter!(
        "backoffice_http_requests_total",
        "Total number of HTTP requests, labelled with the cache outcome"
    );
    metrics::describe_histogram!(
        "backoffice_http_request_duration_seconds",
        "HTTP request duration in seconds; cache hits skip the handler"
    );
}
