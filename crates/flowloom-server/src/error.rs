use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flowloom_llm::GenerateError;
use serde_json::json;
use tracing::error;

/// Boundary wrapper turning pipeline failures into the generic error
/// payload. Diagnostic detail goes to the log, not to the caller.
pub struct ApiError(pub GenerateError);

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("workflow generation failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to generate workflow JSON."})),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn maps_every_failure_to_generic_500() {
        for err in [
            GenerateError::NoJsonFound,
            GenerateError::BackendUnavailable("connection refused".to_string()),
        ] {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(payload["error"], "Failed to generate workflow JSON.");
        }
    }
}
