//! Backoffice Server - partner configuration API with a response cache
//!
//! Axum service exposing the partner configuration CRUD endpoints behind
//! service API key authentication. Reads are answered from a key-value
//! store when a response for the same partner, origin, credential and path
//! was stored before; every write invalidates the affected entries.

pub mod auth;
pub mod cache;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{create_app, create_router_with_state, run_server_with_state};
pub use settings::{Settings, SettingsError};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
