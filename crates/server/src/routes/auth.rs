use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::domain::LoginInput;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::storage::ImageStore;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub images: Arc<dyn ImageStore>,
    pub hero_dir: PathBuf,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: String,
    pub role: String,
    pub exp: usize,
}

pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), (StatusCode, Json<serde_json::Value>)> {
    let repo = Arc::new(SeaOrmAuthRepository { db: state.db.clone() });
    let svc = AuthService::new(
        repo,
        AuthConfig {
            jwt_secret: Some(state.auth.jwt_secret.clone()),
            password_algorithm: "argon2".into(),
        },
    );
    let session = svc.login(input).await.map_err(|e| {
        (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"error": e.to_string()})))
    })?;
    let user = session.user;
    let Some(token) = session.token else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "token generation failed"})),
        ));
    };

    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(axum_extra::extract::cookie::SameSite::Lax);
    let jar = jar.add(cookie);
    let out = LoginOutput { user_id: user.id, email: user.email, name: user.name, role: user.role };
    Ok((jar, Json(out)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from(AUTH_COOKIE));
    (jar, StatusCode::NO_CONTENT)
}

pub async fn me(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<Json<MeOutput>, (StatusCode, Json<serde_json::Value>)> {
    let unauthorized = || (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"error": "not authenticated"})));

    let token = jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).ok_or_else(unauthorized)?;
    let claims = decode_claims(&token, &state.auth.jwt_secret).ok_or_else(unauthorized)?;
    let uid = Uuid::parse_str(&claims.uid).map_err(|_| unauthorized())?;

    let user = models::user::Entity::find_by_id(uid)
        .one(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({"error": e.to_string()}))))?
        .ok_or_else(unauthorized)?;

    Ok(Json(MeOutput { user_id: user.id, email: user.email, name: user.name, role: user.role }))
}

pub fn decode_claims(token: &str, secret: &str) -> Option<Claims> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &key, &validation).ok().map(|d| d.claims)
}

/// Pull the session token from the `auth_token` cookie, falling back to an
/// `Authorization: Bearer` header.
fn token_from_request(req: &Request) -> Option<String> {
    let cookie_header = req
        .headers()
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some(rest) = kv.strip_prefix("auth_token=") {
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }

    let authz = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;
    authz.strip_prefix("Bearer ").map(|t| t.to_string())
}

/// Session gate for the admin pages.
///
/// - unauthenticated access to any `/admin/*` path except the login page is
///   redirected to `/admin/login`
/// - authenticated access to the login page is redirected to the dashboard
/// - everything else passes through untouched
pub async fn admin_gate(State(state): State<ServerState>, req: Request, next: Next) -> Response {
    let path = req.uri().path();
    if path == "/admin" || path.starts_with("/admin/") {
        let authenticated = token_from_request(&req)
            .and_then(|t| decode_claims(&t, &state.auth.jwt_secret))
            .is_some();
        let is_login_page = path == "/admin/login" || path.starts_with("/admin/login/");

        if is_login_page {
            if authenticated {
                return Redirect::to("/admin/dashboard").into_response();
            }
        } else if !authenticated {
            tracing::debug!(%path, "unauthenticated admin access, redirecting to login");
            return Redirect::to("/admin/login").into_response();
        }
    }
    next.run(req).await
}
