use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use pathseeker_core::CoreError;

/// HTTP-facing error wrapper. Core outcomes map onto status codes; internal
/// failures are logged here and flattened to a generic message so raw
/// errors never reach the client.
pub enum ApiError {
    Core(CoreError),
    Unauthorized(&'static str),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Core(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Core(CoreError::Internal(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            ApiError::Core(err) => match &err {
                CoreError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                CoreError::PermissionDenied(_) => (StatusCode::FORBIDDEN, err.to_string()),
                CoreError::InvalidInput(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                CoreError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
                CoreError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
                CoreError::Internal(e) => {
                    error!("Internal error: {:#}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Something went wrong on our side".to_string(),
                    )
                }
            },
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
