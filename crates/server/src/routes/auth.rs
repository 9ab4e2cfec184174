use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use desk_shared::constants::SESSION_COOKIE;
use desk_shared::validation::{validate_password, validate_username};
use std::sync::Arc;

use crate::accounts::{self, AccountError};
use crate::middleware::auth::session_token;
use crate::models::{LoginRequest, RegisterRequest};
use crate::AppState;

fn error(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn session_cookie(token: &str, max_age_secs: i64) -> HeaderMap {
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    );
    let mut headers = HeaderMap::new();
    if let Ok(value) = cookie.parse() {
        headers.insert("set-cookie", value);
    }
    headers
}

/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> impl IntoResponse {
    let username = body.username.trim().to_string();

    if let Err(msg) = validate_username(&username) {
        return error(StatusCode::BAD_REQUEST, &msg);
    }
    if let Err(msg) = validate_password(&body.password) {
        return error(StatusCode::BAD_REQUEST, &msg);
    }

    let record = match accounts::register(&state.db, &username, &body.password).await {
        Ok(record) => record,
        Err(AccountError::UsernameTaken) => {
            return error(StatusCode::CONFLICT, "Username already taken")
        }
        Err(e) => {
            tracing::error!("Error registering user: {}", e);
            return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to register user");
        }
    };

    let token = match accounts::create_session(&state.db, &record.username, state.config.session_ttl_days).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Error creating session: {}", e);
            return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to register user");
        }
    };

    tracing::info!(username = %record.username, address = %record.address, "registered user");

    (
        session_cookie(&token, state.config.session_ttl_days * 86_400),
        Json(serde_json::json!({
            "success": true,
            "username": record.username,
            "token": token,
        })),
    )
        .into_response()
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> impl IntoResponse {
    let username = body.username.trim();

    let record = match accounts::verify_login(&state.db, username, &body.password).await {
        Ok(Some(record)) => record,
        Ok(None) => return error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        Err(e) => {
            tracing::error!("Error logging in: {}", e);
            return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to log in");
        }
    };

    let token = match accounts::create_session(&state.db, &record.username, state.config.session_ttl_days).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Error creating session: {}", e);
            return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to log in");
        }
    };

    (
        session_cookie(&token, state.config.session_ttl_days * 86_400),
        Json(serde_json::json!({
            "success": true,
            "user": record.username,
            "token": token,
        })),
    )
        .into_response()
}

/// GET /api/logout
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        if let Err(e) = accounts::delete_session(&state.db, &token).await {
            tracing::error!("Error deleting session: {}", e);
        }
    }

    (
        session_cookie("", 0),
        Json(serde_json::json!({ "success": true })),
    )
        .into_response()
}
