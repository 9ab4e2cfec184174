#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use desk_server::{
    accounts,
    config::Config,
    network::{Account, MessageNetwork, NetworkError, Receipt, RemoteMessage},
    relay::Relay,
    routes, AppState,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Create an in-memory SQLite pool with schema applied.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();

    desk_server::db::apply_schema(&pool).await.unwrap();
    pool
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        database_path: ":memory:".into(),
        aleph_api_url: "http://127.0.0.1:1".into(),
        aleph_channel: "BANKADMIN".into(),
        aleph_chain: "SOL".into(),
        aleph_timeout: Duration::from_secs(1),
        session_ttl_days: 30,
    }
}

/// A post recorded by [`FakeNetwork`].
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub address: String,
    pub room: String,
    pub body: String,
}

/// In-process stand-in for the message network that records every call.
#[derive(Default)]
pub struct FakeNetwork {
    rooms: Mutex<HashMap<String, Vec<RemoteMessage>>>,
    posts: Mutex<Vec<RecordedPost>>,
    fetches: AtomicUsize,
    fail_fetch: AtomicBool,
    fail_post: AtomicBool,
    empty_hash: AtomicBool,
}

impl FakeNetwork {
    pub fn seed(&self, room: &str, messages: Vec<RemoteMessage>) {
        self.rooms.lock().unwrap().insert(room.to_string(), messages);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_post(&self, fail: bool) {
        self.fail_post.store(fail, Ordering::SeqCst);
    }

    pub fn set_empty_hash(&self, empty: bool) {
        self.empty_hash.store(empty, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageNetwork for FakeNetwork {
    async fn fetch_room(&self, room: &str) -> Result<Vec<RemoteMessage>, NetworkError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(NetworkError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(self
            .rooms
            .lock()
            .unwrap()
            .get(room)
            .cloned()
            .unwrap_or_default())
    }

    async fn post(
        &self,
        account: &Account,
        room: &str,
        body: &str,
    ) -> Result<Receipt, NetworkError> {
        if self.fail_post.load(Ordering::SeqCst) {
            return Err(NetworkError::Status {
                status: 502,
                body: "bad gateway".into(),
            });
        }
        let mut posts = self.posts.lock().unwrap();
        posts.push(RecordedPost {
            address: account.address(),
            room: room.to_string(),
            body: body.to_string(),
        });
        let item_hash = if self.empty_hash.load(Ordering::SeqCst) {
            String::new()
        } else {
            format!("hash-{}", posts.len())
        };
        Ok(Receipt { item_hash })
    }
}

pub fn remote_message(hash: &str, sender: &str, time: f64, body: &str) -> RemoteMessage {
    RemoteMessage {
        item_hash: hash.into(),
        sender: sender.into(),
        time,
        content: serde_json::json!({ "type": "chat", "body": body }),
    }
}

/// Build a test Axum app with the given pool and network.
pub fn create_test_app(pool: SqlitePool, network: Arc<dyn MessageNetwork>) -> Router {
    let state = Arc::new(AppState {
        relay: Relay::new(pool.clone(), network),
        db: pool,
        config: test_config(),
    });

    routes::build_router(state)
}

/// Register a user directly. Returns (address, session_token).
pub async fn create_test_user(pool: &SqlitePool, username: &str, password: &str) -> (String, String) {
    let record = accounts::register(pool, username, password).await.unwrap();
    let token = accounts::create_session(pool, username, 30).await.unwrap();
    (record.address, token)
}

pub async fn cached_count(pool: &SqlitePool, room: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE room_id = ?")
        .bind(room)
        .fetch_one(pool)
        .await
        .unwrap()
}
