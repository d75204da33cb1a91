use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use dashlet_domain::{DomainError, Service, ServiceList, ServicePatch};
use tracing::{debug, instrument};

use crate::{
    dto::{CreateServiceRequest, ReorderServicesRequest},
    errors::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/services",
            get(get_services).post(create_service).put(replace_services),
        )
        .route("/services/reorder", post(reorder_services))
        .route(
            "/services/{id}",
            get(get_service).patch(update_service).delete(delete_service),
        )
}

async fn get_services(State(state): State<AppState>) -> Json<ServiceList> {
    let services = state.services.get_all().await;
    debug!(count = services.len(), "Services retrieved");
    Json(services)
}

async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Service>, ApiError> {
    state
        .services
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError(DomainError::ServiceNotFound(id)))
}

#[instrument(skip(state, req))]
async fn create_service(
    State(state): State<AppState>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    let service = state.services.add(req.into()).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

#[instrument(skip(state, services), fields(count = services.len()))]
async fn replace_services(
    State(state): State<AppState>,
    Json(services): Json<ServiceList>,
) -> Result<Json<ServiceList>, ApiError> {
    if let Some(bad) = services.iter().find(|s| s.id.is_empty() || s.url.is_empty()) {
        return Err(ApiError(DomainError::Validation(format!(
            "service '{}' needs both an id and a url",
            bad.id
        ))));
    }
    state.services.replace_all(services).await?;
    Ok(Json(state.services.get_all().await))
}

#[instrument(skip(state, req))]
async fn reorder_services(
    State(state): State<AppState>,
    Json(req): Json<ReorderServicesRequest>,
) -> Result<Json<ServiceList>, ApiError> {
    state.services.reorder(&req.ids).await?;
    Ok(Json(state.services.get_all().await))
}

#[instrument(skip(state, patch))]
async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ServicePatch>,
) -> Result<Json<Service>, ApiError> {
    state
        .services
        .update(&id, &patch)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError(DomainError::ServiceNotFound(id)))
}

#[instrument(skip(state))]
async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.services.remove(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError(DomainError::ServiceNotFound(id)))
    }
}
