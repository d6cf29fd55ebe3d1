use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{error, info};

use crate::routes::auth::ServerState;
use service::errors::ServiceError;
use service::upload::store_image;

#[derive(Serialize)]
pub struct UploadOutput {
    pub success: bool,
    pub path: String,
    pub filename: String,
}

fn error_body(msg: impl Into<String>) -> Json<serde_json::Value> {
    Json(serde_json::json!({"error": msg.into()}))
}

/// Accept one multipart `file` field, validate it, and persist it through the
/// configured image store.
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<UploadOutput>, (StatusCode, Json<serde_json::Value>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, error_body(e.to_string())))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, error_body(e.to_string())))?;

        return match store_image(state.images.as_ref(), &original_name, &content_type, &bytes).await {
            Ok(stored) => {
                info!(filename = %stored.filename, path = %stored.path, size = bytes.len(), "image uploaded");
                Ok(Json(UploadOutput { success: true, path: stored.path, filename: stored.filename }))
            }
            Err(e @ ServiceError::Validation(_)) => {
                info!(err = %e, %original_name, %content_type, "upload rejected");
                Err((StatusCode::BAD_REQUEST, error_body(e.to_string())))
            }
            Err(e) => {
                error!(err = %e, %original_name, "upload failed");
                Err((StatusCode::INTERNAL_SERVER_ERROR, error_body("could not store file")))
            }
        };
    }

    Err((StatusCode::BAD_REQUEST, error_body("no file provided")))
}
