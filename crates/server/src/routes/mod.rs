pub mod auth;
pub mod messages;
pub mod users;

use crate::AppState;
use axum::{routing::{get, post}, Router};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Relay
        .route(
            "/messages/{room}",
            get(messages::list_messages).post(messages::send_message),
        )
        // Accounts
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/users/{username}", get(users::get_user));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}
