use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;

use crate::auth::authenticate_service;
use crate::cache::{PARTNER_CONFIG_ITEM_PATH, PARTNER_CONFIG_PATH, cache_interceptor};
use crate::handlers::{
    health::health_check,
    invalidate::invalidate_patterns,
    metrics::metrics_handler,
    partner_config::{
        create_partner_config, delete_partner_config, get_partner_config, list_partner_configs,
        replace_partner_config, update_partner_config,
    },
};
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Application routes without the `/metrics` endpoint.
fn app_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            PARTNER_CONFIG_PATH,
            get(list_partner_configs).post(create_partner_config),
        )
        .route(
            PARTNER_CONFIG_ITEM_PATH,
            get(get_partner_config)
                .put(replace_partner_config)
                .patch(update_partner_config)
                .delete(delete_partner_config),
        )
        .route("/cache/invalidate", post(invalidate_patterns))
        .with_state(state)
}

/// Applies the middleware stack, outermost first:
/// request id, logging, HTTP metrics, response cache, authentication.
///
/// The response cache sits outside authentication, so a hit is answered
/// before the service key is looked up.
fn with_middleware(router: Router, state: &AppState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    router
        .layer(middleware::from_fn_with_state(
            state.api_key_store(),
            authenticate_service,
        ))
        .layer(middleware::from_fn_with_state(
            state.cache_layer().clone(),
            cache_interceptor,
        ))
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(middleware_stack)
}

/// Creates the application router (no `/metrics` endpoint).
pub fn create_app(state: AppState) -> Router {
    let routes = app_routes(state.clone());
    with_middleware(routes, &state)
}

/// Creates a router with the given application state and metrics handle.
pub fn create_router_with_state(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    let routes = Router::new()
        .merge(app_routes(state.clone()))
        .merge(metrics_router);

    with_middleware(routes, &state)
}

/// Runs the server with the given state and metrics handle.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router_with_state(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
