use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use desk_shared::constants::CHAT_CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

use super::{Account, MessageNetwork, NetworkError, Receipt, RemoteMessage};

const MESSAGES_PATH: &str = "api/v0/messages";
const POST_MESSAGE_TYPE: &str = "POST";
const INLINE_ITEM_TYPE: &str = "inline";

/// HTTP client for an Aleph API node.
#[derive(Clone)]
pub struct AlephClient {
    http: reqwest::Client,
    api_url: Url,
    channel: String,
    chain: String,
}

#[derive(Deserialize)]
struct MessagesPage {
    messages: Vec<RemoteMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// The signed payload; serialized into `item_content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemContent {
    pub address: String,
    pub time: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: ChatContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostEnvelope {
    pub chain: String,
    pub sender: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub channel: String,
    pub time: f64,
    pub item_type: String,
    pub item_content: String,
    pub item_hash: String,
    pub signature: String,
}

/// Builds a signed inline POST message for `room`.
pub fn build_post(
    account: &Account,
    chain: &str,
    channel: &str,
    room: &str,
    body: &str,
    time: f64,
) -> Result<PostEnvelope, NetworkError> {
    let sender = account.address();
    let item = ItemContent {
        address: sender.clone(),
        time,
        kind: CHAT_CONTENT_TYPE.to_string(),
        content: ChatContent {
            kind: CHAT_CONTENT_TYPE.to_string(),
            body: body.to_string(),
            tags: vec![desk_shared::constants::room_tag(room)],
        },
    };
    let item_content =
        serde_json::to_string(&item).map_err(|e| NetworkError::Decode(e.to_string()))?;
    let item_hash = hex::encode(Sha256::digest(item_content.as_bytes()));

    let verification = format!("{}\n{}\n{}\n{}", chain, sender, POST_MESSAGE_TYPE, item_hash);
    let signature = serde_json::json!({
        "signature": account.sign(verification.as_bytes()),
        "publicKey": account.public_key_hex(),
    })
    .to_string();

    Ok(PostEnvelope {
        chain: chain.to_string(),
        sender,
        message_type: POST_MESSAGE_TYPE.to_string(),
        channel: channel.to_string(),
        time,
        item_type: INLINE_ITEM_TYPE.to_string(),
        item_content,
        item_hash,
        signature,
    })
}

impl AlephClient {
    pub fn new(
        api_url: &str,
        channel: impl Into<String>,
        chain: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        // Url::join drops the last path segment unless the base ends with '/'
        let mut base = api_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url: Url::parse(&base)?,
            channel: channel.into(),
            chain: chain.into(),
        })
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    fn messages_url(&self) -> Result<Url, NetworkError> {
        Ok(self.api_url.join(MESSAGES_PATH)?)
    }
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, NetworkError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(NetworkError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl MessageNetwork for AlephClient {
    async fn fetch_room(&self, room: &str) -> Result<Vec<RemoteMessage>, NetworkError> {
        let tag = desk_shared::constants::room_tag(room);
        let res = self
            .http
            .get(self.messages_url()?)
            .query(&[("channel", self.channel.as_str()), ("tags", tag.as_str())])
            .send()
            .await?;
        let res = check_status(res).await?;

        let page: MessagesPage = res
            .json()
            .await
            .map_err(|e| NetworkError::Decode(e.to_string()))?;
        tracing::debug!(room, count = page.messages.len(), "fetched room from message network");
        Ok(page.messages)
    }

    async fn post(
        &self,
        account: &Account,
        room: &str,
        body: &str,
    ) -> Result<Receipt, NetworkError> {
        let time = Utc::now().timestamp_millis() as f64 / 1000.0;
        let envelope = build_post(account, &self.chain, &self.channel, room, body, time)?;

        let res = self
            .http
            .post(self.messages_url()?)
            .json(&serde_json::json!({
                "sync": true,
                "message": envelope,
            }))
            .send()
            .await?;
        check_status(res).await?;

        tracing::debug!(room, item_hash = %envelope.item_hash, "broadcast message");
        Ok(Receipt {
            item_hash: envelope.item_hash,
        })
    }
}
