use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::accounts;
use crate::models::{AuthUser, UserProfile};
use crate::AppState;

/// GET /api/users/:username
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(username): Path<String>,
) -> impl IntoResponse {
    match accounts::find_credentials(&state.db, &username).await {
        Ok(Some(record)) => Json(UserProfile::from(record)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "User not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error fetching user: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to fetch user" })),
            )
                .into_response()
        }
    }
}
