use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use dashlet_application::use_cases::ImportSummary;
use dashlet_domain::{DocumentFormat, DomainError};
use tracing::instrument;

use crate::{
    dto::{CheckResponse, FormatQuery, WatchStatusResponse},
    errors::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/config/export", get(export_config))
        .route("/config/import", post(import_config))
        .route("/config/check", post(check_config))
        .route("/config/watch", get(watch_status))
}

fn parse_format(raw: Option<&str>) -> Result<Option<DocumentFormat>, ApiError> {
    match raw.map(|f| f.trim().to_ascii_lowercase()).as_deref() {
        None => Ok(None),
        Some("json") => Ok(Some(DocumentFormat::Json)),
        Some("yaml") | Some("yml") => Ok(Some(DocumentFormat::Yaml)),
        Some(other) => Err(ApiError(DomainError::Validation(format!(
            "unsupported format '{}'",
            other
        )))),
    }
}

#[instrument(skip(state))]
async fn export_config(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format = parse_format(query.format.as_deref())?.unwrap_or_default();
    let body = state.export_config.render(format).await?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], body))
}

#[instrument(skip(state, headers, body), fields(bytes = body.len()))]
async fn import_config(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ImportSummary>, ApiError> {
    let format = match parse_format(query.format.as_deref())? {
        Some(format) => format,
        None => headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(DocumentFormat::from_content_type)
            .unwrap_or_default(),
    };

    let summary = state.import_config.execute(&body, format).await?;
    Ok(Json(summary))
}

#[instrument(skip(state))]
async fn check_config(State(state): State<AppState>) -> Result<Json<CheckResponse>, ApiError> {
    let watcher = state.watcher.as_ref().ok_or_else(|| {
        ApiError(DomainError::ConfigError(
            "no external config location is configured".to_string(),
        ))
    })?;

    let outcome = watcher.check().await;
    Ok(Json(CheckResponse::from_outcome(outcome)))
}

async fn watch_status(State(state): State<AppState>) -> Json<WatchStatusResponse> {
    let Some(watcher) = state.watcher.as_ref() else {
        return Json(WatchStatusResponse::disabled());
    };

    Json(WatchStatusResponse {
        enabled: true,
        active: watcher.is_active(),
        state: WatchStatusResponse::state_name(watcher.state()),
        source: Some(watcher.source_description()),
        has_baseline: watcher.last_snapshot().is_some(),
    })
}
