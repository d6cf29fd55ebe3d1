use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::auth::ServerState;
use models::errors::ModelError;
use service::catalog;
use service::errors::ServiceError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `active=true` narrows the listing to publicly visible services.
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateServiceInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateServiceInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub img: Option<String>,
    pub is_active: Option<bool>,
}

fn error_body(msg: impl Into<String>) -> Json<serde_json::Value> {
    Json(serde_json::json!({"error": msg.into()}))
}

/// Map a mutation failure to a status and body. Only rejected input becomes a
/// 400; database trouble stays a 500 with a generic message so driver text
/// never reaches the caller.
fn mutation_error(e: ServiceError, fallback: &str) -> (StatusCode, Json<serde_json::Value>) {
    match e {
        ServiceError::Validation(_) | ServiceError::Model(ModelError::Validation(_)) => {
            (StatusCode::BAD_REQUEST, error_body(e.to_string()))
        }
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, error_body(e.to_string())),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, error_body(fallback)),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<models::service::Model>>, (StatusCode, Json<serde_json::Value>)> {
    match catalog::list_services(&state.db, q.active).await {
        Ok(list) => {
            info!(count = list.len(), active = ?q.active, "list services");
            Ok(Json(list))
        }
        Err(e) => {
            error!(err = %e, "list services failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, error_body("could not fetch services")))
        }
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateServiceInput>,
) -> Result<Json<models::service::Model>, (StatusCode, Json<serde_json::Value>)> {
    match catalog::create_service(
        &state.db,
        &input.title,
        &input.description,
        input.img.as_deref(),
        input.is_active,
    )
    .await
    {
        Ok(m) => {
            info!(id = %m.id, title = %m.title, is_active = m.is_active, "created service");
            Ok(Json(m))
        }
        Err(e) => {
            error!(err = %e, "create service failed");
            Err(mutation_error(e, "could not create service"))
        }
    }
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::service::Model>, (StatusCode, Json<serde_json::Value>)> {
    match catalog::get_service(&state.db, id).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err((StatusCode::NOT_FOUND, error_body("service not found"))),
        Err(e) => {
            error!(err = %e, %id, "get service failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, error_body("could not fetch service")))
        }
    }
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateServiceInput>,
) -> Result<Json<models::service::Model>, (StatusCode, Json<serde_json::Value>)> {
    match catalog::update_service(
        &state.db,
        id,
        input.title.as_deref(),
        input.description.as_deref(),
        input.img.as_deref(),
        input.is_active,
    )
    .await
    {
        Ok(m) => {
            info!(id = %m.id, "updated service");
            Ok(Json(m))
        }
        Err(e) => {
            error!(err = %e, %id, "update service failed");
            Err(mutation_error(e, "could not update service"))
        }
    }
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match catalog::delete_service(&state.db, id).await {
        Ok(true) => {
            info!(%id, "deleted service");
            Ok(Json(serde_json::json!({"message": "service deleted"})))
        }
        Ok(false) => Err((StatusCode::NOT_FOUND, error_body("service not found"))),
        Err(e) => {
            error!(err = %e, %id, "delete service failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, error_body("could not delete service")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_input_maps_to_bad_request() {
        let (status, _) = mutation_error(ServiceError::Validation("title required".into()), "fallback");
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = mutation_error(
            ServiceError::Model(ModelError::Validation("description required".into())),
            "fallback",
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.0["error"].as_str().unwrap().contains("description required"));
    }

    #[test]
    fn database_failure_maps_to_generic_server_error() {
        let driver_msg = "connection refused (os error 111)";

        let (status, body) = mutation_error(
            ServiceError::Model(ModelError::Db(driver_msg.into())),
            "could not create service",
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0["error"], "could not create service");
        assert!(!body.0["error"].as_str().unwrap().contains(driver_msg));

        let (status, _) = mutation_error(ServiceError::Db(driver_msg.into()), "could not update service");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_row_maps_to_not_found() {
        let (status, _) = mutation_error(ServiceError::not_found("service"), "fallback");
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
