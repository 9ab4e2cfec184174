use axum::http::{HeaderName, Method};
use desk_shared::constants::APP_NAME;
use desk_server::{config::Config, db, network::AlephClient, relay::Relay, routes, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "desk_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();

    let pool = db::init_pool(&config.database_path)
        .await
        .expect("Failed to initialize database");

    let network = AlephClient::new(
        &config.aleph_api_url,
        config.aleph_channel.clone(),
        config.aleph_chain.clone(),
        config.aleph_timeout,
    )
    .expect("Failed to build message network client");
    tracing::info!(
        "Relaying channel {} via {}",
        network.channel(),
        config.aleph_api_url
    );

    let state = Arc::new(AppState {
        relay: Relay::new(pool.clone(), Arc::new(network)),
        db: pool,
        config: config.clone(),
    });

    let app = routes::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::AllowOrigin::mirror_request())
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    HeaderName::from_static("content-type"),
                    HeaderName::from_static("cookie"),
                    HeaderName::from_static("authorization"),
                ])
                .allow_credentials(true),
        );

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");

    tracing::info!("{} running on {}", APP_NAME, addr);

    axum::serve(listener, app).await.expect("Server error");
}
