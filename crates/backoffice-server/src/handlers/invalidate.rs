//! Cache invalidation endpoint handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use backoffice_store::KeyPattern;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::RequireService;
use crate::error::AppError;
use crate::state::AppState;

/// Request body para invalidación por patrones.
#[derive(Debug, Deserialize)]
pub struct InvalidateRequest {
    /// Lista de patrones glob a invalidar.
    pub patterns: Vec<String>,
    /// Si se indica, cada patrón se expande a `patron + uri + "*"`.
    #[serde(default)]
    pub uris: Vec<String>,
}

/// Response para operaciones de invalidación.
#[derive(Debug, Serialize, Deserialize)]
pub struct InvalidateResponse {
    /// Número de keys eliminadas.
    pub invalidated: u64,
    /// Patrones efectivamente aplicados.
    pub patterns: Vec<String>,
    /// Mensaje descriptivo.
    pub message: String,
}

/// POST /cache/invalidate
#[instrument(skip_all, fields(service = %service.service_name))]
pub async fn invalidate_patterns(
    State(state): State<AppState>,
    RequireService(service): RequireService,
    payload: Result<Json<InvalidateRequest>, JsonRejection>,
) -> Result<Json<InvalidateResponse>, AppError> {
    let Json(request) = payload?;

    if request.patterns.is_empty() {
        return Err(AppError::BadRequest(
            "At least one pattern is required".to_string(),
        ));
    }
    for pattern in &request.patterns {
        validate_pattern(pattern)?;
    }

    let result = state
        .cache()
        .invalidate_by_patterns(&request.patterns, &request.uris)
        .await
        .map_err(|e| AppError::ServiceUnavailable(format!("Cache store error: {e}")))?;

    tracing::info!(count = result.count, patterns = ?result.patterns, "Cache entries invalidated");

    Ok(Json(InvalidateResponse {
        invalidated: result.count,
        message: format!("Invalidated {} cache entries", result.count),
        patterns: result.patterns,
    }))
}

/// Rejects patterns the store could not match the way Redis would.
fn validate_pattern(pattern: &str) -> Result<(), AppError> {
    if pattern.trim().is_empty() {
        return Err(AppError::BadRequest("Patterns must not be empty".to_string()));
    }

    KeyPattern::new(pattern)
        .map(|_| ())
        .map_err(|e| AppError::BadRequest(e.to_string()))
}
