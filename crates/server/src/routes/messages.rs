use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::models::SendMessageRequest;
use crate::AppState;

/// GET /api/messages/:room
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> impl IntoResponse {
    match state.relay.read_room(&room).await {
        Ok(messages) => Json(messages).into_response(),
        Err(e) => {
            tracing::error!(room = %room, "Error fetching messages: {}", e);
            e.into_response_with("Failed to fetch messages")
        }
    }
}

/// POST /api/messages/:room
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
    body: Result<Json<SendMessageRequest>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": rejection.body_text() })),
            )
                .into_response()
        }
    };

    match state.relay.send(&room, body).await {
        Ok(message) => Json(message).into_response(),
        Err(e) => {
            tracing::error!(room = %room, "Error sending message: {}", e);
            e.into_response_with("Failed to send message")
        }
    }
}
