use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use dashlet_domain::{DomainError, SettingKey, SettingValue, SettingsMap};
use tracing::{info, instrument};

use crate::{
    dto::{SettingsImportResponse, UpdateSettingRequest},
    errors::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(get_settings))
        .route("/settings/reset", post(reset_settings))
        .route("/settings/export", get(export_settings))
        .route("/settings/import", post(import_settings))
        .route("/settings/{key}", put(update_setting))
}

async fn get_settings(State(state): State<AppState>) -> Json<SettingsMap> {
    Json(state.settings.snapshot().await)
}

#[instrument(skip(state, req))]
async fn update_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<UpdateSettingRequest>,
) -> Result<Json<SettingsMap>, ApiError> {
    let key: SettingKey = key.parse()?;
    let value = SettingValue::from_json(&req.value).ok_or_else(|| {
        ApiError(DomainError::Validation(format!(
            "{} expects a {:?} value",
            key,
            key.kind()
        )))
    })?;

    state.settings.set(key, value).await?;
    Ok(Json(state.settings.snapshot().await))
}

#[instrument(skip(state))]
async fn reset_settings(State(state): State<AppState>) -> Result<Json<SettingsMap>, ApiError> {
    state.settings.reset().await?;
    Ok(Json(state.settings.snapshot().await))
}

async fn export_settings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.settings.export_snapshot().await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

#[instrument(skip(state, body), fields(bytes = body.len()))]
async fn import_settings(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<SettingsImportResponse>, ApiError> {
    let applied = state.settings.import_snapshot(&body).await?;
    info!(applied, "Settings imported");
    Ok(Json(SettingsImportResponse { applied }))
}
