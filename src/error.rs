use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Recoverable outcomes the API distinguishes for callers. Everything maps to
/// a JSON `{"error": ...}` body; nothing here is process-fatal.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Access denied")]
    Forbidden,
    /// Entity exists but is in a state that forbids the operation, e.g.
    /// editing a sprint that is no longer upcoming.
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Validation(String),
    #[error("Invalid credentials or inactive account")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{entity} not found"))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            Self::InvalidState(msg) | Self::Validation(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
