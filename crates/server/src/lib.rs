pub mod accounts;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod network;
pub mod relay;
pub mod routes;
pub mod store;

use config::Config;
use relay::Relay;

pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: Config,
    pub relay: Relay,
}
