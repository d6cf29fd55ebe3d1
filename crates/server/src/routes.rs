pub mod auth;
pub mod hero;
pub mod services;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use auth::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: JSON API, auth, static assets, and the
/// admin gate in front of everything.
pub fn build_router(frontend_dir: &str, cors: CorsLayer, state: ServerState) -> Router {
    let static_dir =
        ServeDir::new(frontend_dir).fallback(ServeFile::new(format!("{frontend_dir}/index.html")));

    // Multipart bodies may exceed the default limit; the handler enforces the
    // real 5MB cap itself so oversized files get a clean 400.
    let upload_route = post(upload::upload).layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    Router::new()
        .route("/health", get(health))
        .route("/api/services", get(services::list).post(services::create))
        .route(
            "/api/services/:id",
            get(services::get).put(services::update).delete(services::delete),
        )
        .route("/api/hero-images", get(hero::list))
        .route("/api/upload", upload_route)
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .fallback_service(static_dir)
        .layer(middleware::from_fn_with_state(state.clone(), auth::admin_gate))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
