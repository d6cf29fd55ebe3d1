use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[derive(Serialize)]
pub struct HeroImagesOutput {
    pub images: Vec<String>,
}

/// Static asset discovery for the landing page carousel.
pub async fn list(State(state): State<ServerState>) -> Result<Json<HeroImagesOutput>, ApiError> {
    let images = service::hero::list_hero_images(&state.hero_dir)
        .await
        .map_err(|e| ApiError(e.to_string()))?;
    Ok(Json(HeroImagesOutput { images }))
}
