//! Partner configuration CRUD handlers.
//!
//! Every mutation drops the cached responses derived from the partner
//! configuration routes before it answers, so the next read goes back to
//! the repository.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use backoffice_core::{NewPartnerConfig, PartnerConfig, PartnerConfigPatch};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::auth::RequireService;
use crate::cache::PARTNER_CONFIG_PATH;
use crate::error::AppError;
use crate::state::AppState;

/// Body de GET /partner-config.
#[derive(Debug, Serialize, Deserialize)]
pub struct PartnerConfigList {
    pub results: Vec<PartnerConfig>,
}

/// GET /partner-config
#[instrument(skip_all, fields(service = %service.service_name))]
pub async fn list_partner_configs(
    State(state): State<AppState>,
    RequireService(service): RequireService,
) -> Result<Json<PartnerConfigList>, AppError> {
    let results = state.repository().list().await?;
    debug!(count = results.len(), "Partner configs listed");

    Ok(Json(PartnerConfigList { results }))
}

/// GET /partner-config/{id}
#[instrument(skip_all, fields(service = %service.service_name))]
pub async fn get_partner_config(
    State(state): State<AppState>,
    RequireService(service): RequireService,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<PartnerConfig>, AppError> {
    let Path(id) = path?;
    Ok(Json(state.repository().get(id).await?))
}

/// POST /partner-config
#[instrument(skip_all, fields(service = %service.service_name))]
pub async fn create_partner_config(
    State(state): State<AppState>,
    RequireService(service): RequireService,
    payload: Result<Json<NewPartnerConfig>, JsonRejection>,
) -> Result<(StatusCode, Json<PartnerConfig>), AppError> {
    let Json(input) = payload?;
    let created = state.repository().create(input).await?;

    info!(id = created.id, name = %created.name, "Partner config created");
    invalidate_partner_responses(&state).await;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /partner-config/{id}
#[instrument(skip_all, fields(service = %service.service_name))]
pub async fn replace_partner_config(
    State(state): State<AppState>,
    RequireService(service): RequireService,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<NewPartnerConfig>, JsonRejection>,
) -> Result<Json<PartnerConfig>, AppError> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let updated = state.repository().replace(id, input).await?;

    info!(id = id, "Partner config replaced");
    invalidate_partner_responses(&state).await;

    Ok(Json(updated))
}

/// PATCH /partner-config/{id}
#[instrument(skip_all, fields(service = %service.service_name))]
pub async fn update_partner_config(
    State(state): State<AppState>,
    RequireService(service): RequireService,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<PartnerConfigPatch>, JsonRejection>,
) -> Result<Json<PartnerConfig>, AppError> {
    let Path(id) = path?;
    let Json(patch) = payload?;
    let updated = state.repository().update(id, patch).await?;

    info!(id = id, "Partner config updated");
    invalidate_partner_responses(&state).await;

    Ok(Json(updated))
}

/// DELETE /partner-config/{id}
#[instrument(skip_all, fields(service = %service.service_name))]
pub async fn delete_partner_config(
    State(state): State<AppState>,
    RequireService(service): RequireService,
    path: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    state.repository().delete(id).await?;

    info!(id = id, "Partner config deleted");
    invalidate_partner_responses(&state).await;

    Ok(StatusCode::NO_CONTENT)
}

/// Drops composite keys under `/partner-config` and the bare credential
/// keys of every provisioned service.
async fn invalidate_partner_responses(state: &AppState) {
    let credentials = match state.api_keys().keys().await {
        Ok(keys) => keys,
        Err(e) => {
            warn!(error = %e, "Could not list service keys for invalidation");
            Vec::new()
        },
    };

    let result = state
        .cache()
        .invalidate_resource(&[PARTNER_CONFIG_PATH.to_string()], &credentials)
        .await;

    debug!(count = result.count, "Partner config responses invalidated");
}
