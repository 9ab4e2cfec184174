use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::network::NetworkError;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    BadRequest(String),
    #[error("user {0} not found")]
    NotFound(String),
    #[error("upstream failure: {0}")]
    Upstream(#[from] NetworkError),
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::NotFound(_) => StatusCode::NOT_FOUND,
            RelayError::Upstream(_) | RelayError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing response. Server errors collapse to `fallback`.
    pub fn into_response_with(self, fallback: &str) -> Response {
        let message = match &self {
            RelayError::BadRequest(msg) => msg.clone(),
            RelayError::NotFound(_) => "User not found".to_string(),
            _ => fallback.to_string(),
        };
        (self.status(), Json(serde_json::json!({ "error": message }))).into_response()
    }
}
