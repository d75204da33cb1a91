use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashlet_domain::DomainError;
use serde_json::json;
use tracing::error;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::ServiceNotFound(_) | DomainError::UnknownSetting(_) => {
                (StatusCode::NOT_FOUND, self.0.to_string())
            }

            DomainError::Validation(_)
            | DomainError::ImportRejected(_)
            | DomainError::Parse(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),

            DomainError::ConfigError(_) => (StatusCode::CONFLICT, self.0.to_string()),

            DomainError::Fetch(_) => (StatusCode::BAD_GATEWAY, self.0.to_string()),

            DomainError::DatabaseError(_) => {
                error!(error = %self.0, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
