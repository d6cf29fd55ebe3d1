use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Generic retrieval failure surfaced as a server error with a JSON body.
#[derive(Debug)]
pub struct ApiError(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let msg = self.0;
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}
