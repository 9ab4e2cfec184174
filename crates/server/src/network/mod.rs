//! Client side of the remote message network, the durable log of record.
//!
//! [`MessageNetwork`] is the seam the relay depends on. [`AlephClient`] is the
//! HTTP implementation used in production; tests substitute their own.

mod account;
mod aleph;

pub use account::Account;
pub use aleph::{build_post, AlephClient, ChatContent, ItemContent, PostEnvelope};

use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("request to message network failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("message network returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed message network response: {0}")]
    Decode(String),
    #[error("invalid message network url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid account key: {0}")]
    Key(String),
}

/// One record as returned by `GET /api/v0/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMessage {
    pub item_hash: String,
    pub sender: String,
    /// Epoch seconds, possibly fractional.
    pub time: f64,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl RemoteMessage {
    /// Chat body, either at `content.body` or nested at `content.content.body`.
    pub fn body(&self) -> Option<&str> {
        self.content
            .get("body")
            .and_then(|b| b.as_str())
            .or_else(|| self.content.get("content")?.get("body")?.as_str())
    }
}

/// Broadcast confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub item_hash: String,
}

#[async_trait]
pub trait MessageNetwork: Send + Sync {
    /// All messages on the relay's channel tagged for `room`.
    async fn fetch_room(&self, room: &str) -> Result<Vec<RemoteMessage>, NetworkError>;

    /// Signs `body` with `account` and broadcasts it to `room`.
    async fn post(&self, account: &Account, room: &str, body: &str)
        -> Result<Receipt, NetworkError>;
}
