use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth};
use service::runtime;
use service::storage::local::LocalImageStore;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;

    runtime::ensure_env(&cfg.assets.frontend_dir, &cfg.assets.upload_dir).await?;

    // DB connection and schema
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    // JWT secret
    let jwt_secret =
        std::env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string());

    let images = Arc::new(LocalImageStore::new(
        cfg.assets.upload_dir.clone(),
        cfg.assets.upload_public_prefix.clone(),
    ));
    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret },
        images,
        hero_dir: PathBuf::from(&cfg.assets.hero_dir),
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(&cfg.assets.frontend_dir, cors, state);

    // Bind and serve
    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, "starting clinic site server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
