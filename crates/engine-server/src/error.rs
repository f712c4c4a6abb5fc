//! Maps [`EngineError`] to the HTTP status/body pair the routing and
//! infrastructure error taxonomy describes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use engine_runtime::EngineError;

pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::InstanceNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::InstanceAlreadyExists(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let code = engine_runtime_error_code(&self.0);
        let body = Json(serde_json::json!({
            "errorCode": code,
            "errorMessage": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

fn engine_runtime_error_code(error: &EngineError) -> &'static str {
    use engine_core::GameError;
    error.error_code()
}
