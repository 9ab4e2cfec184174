use std::env;
use std::time::Duration;

use desk_shared::constants::DEFAULT_CHANNEL;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub aleph_api_url: String,
    pub aleph_channel: String,
    pub aleph_chain: String,
    pub aleph_timeout: Duration,
    pub session_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5001),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./desk.db".into()),
            aleph_api_url: env::var("ALEPH_API_URL")
                .unwrap_or_else(|_| "https://api2.aleph.im".into()),
            aleph_channel: env::var("ALEPH_CHANNEL").unwrap_or_else(|_| DEFAULT_CHANNEL.into()),
            aleph_chain: env::var("ALEPH_CHAIN").unwrap_or_else(|_| "SOL".into()),
            aleph_timeout: Duration::from_secs(
                env::var("ALEPH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
            session_ttl_days: env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}
