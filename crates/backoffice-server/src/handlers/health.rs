use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Estado del store de cache. Un store caido no tumba el servicio.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheHealth {
    pub backend: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheHealth>,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "UP".to_string(),
            cache: None,
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.cache();
    let status = if cache.health().await { "UP" } else { "DOWN" };

    Json(HealthResponse {
        cache: Some(CacheHealth {
            backend: cache.backend_name().to_string(),
            status: status.to_string(),
        }),
        ..HealthResponse::default()
    })
}
