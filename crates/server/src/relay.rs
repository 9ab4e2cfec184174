//! The bridge between clients and the remote message network.
//!
//! Reads are cache-first: once a room has any cached message the cache is
//! authoritative for it. Writes go to the network first and are cached only
//! after the broadcast is confirmed.

use std::sync::Arc;

use chrono::Utc;
use desk_shared::validation::{validate_message_content, validate_room_id};
use sqlx::SqlitePool;

use crate::accounts;
use crate::error::RelayError;
use crate::models::{epoch_seconds_to_datetime, millis_to_datetime, Message, SendMessageRequest};
use crate::network::{Account, MessageNetwork, RemoteMessage};
use crate::store::MessageStore;

pub struct Relay {
    db: SqlitePool,
    store: MessageStore,
    network: Arc<dyn MessageNetwork>,
}

impl Relay {
    pub fn new(db: SqlitePool, network: Arc<dyn MessageNetwork>) -> Self {
        Self {
            store: MessageStore::new(db.clone()),
            db,
            network,
        }
    }

    pub async fn read_room(&self, room: &str) -> Result<Vec<Message>, RelayError> {
        validate_room_id(room).map_err(RelayError::BadRequest)?;

        let cached = self.store.find_by_room(room).await?;
        if !cached.is_empty() {
            return Ok(cached);
        }

        let remote = self.network.fetch_room(room).await?;
        let messages = normalize(room, remote);
        if !messages.is_empty() {
            self.store.insert_many(&messages).await?;
            tracing::info!(room, count = messages.len(), "cached room from message network");
        }
        Ok(messages)
    }

    pub async fn send(
        &self,
        room: &str,
        request: SendMessageRequest,
    ) -> Result<Message, RelayError> {
        validate_room_id(room).map_err(RelayError::BadRequest)?;
        validate_message_content(&request.content).map_err(RelayError::BadRequest)?;

        // A resend of a message we already hold is answered from the cache
        if let Some(client_id) = &request.client_id {
            if let Some(existing) = self.store.find_by_client_id(room, client_id).await? {
                return Ok(existing);
            }
        }

        let record = accounts::find_credentials(&self.db, &request.sender)
            .await?
            .ok_or_else(|| RelayError::NotFound(request.sender.clone()))?;
        let account = Account::from_private_key(&record.private_key)?;

        let receipt = self.network.post(&account, room, &request.content).await?;

        let id = if receipt.item_hash.is_empty() {
            request
                .client_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
        } else {
            receipt.item_hash
        };
        let timestamp = request.timestamp.unwrap_or_else(Utc::now);
        let message = Message {
            id,
            room_id: room.to_string(),
            content: request.content,
            sender: request.sender,
            // stored at millisecond precision
            timestamp: millis_to_datetime(timestamp.timestamp_millis()),
            client_id: request.client_id,
        };

        match self.store.insert(&message).await {
            Ok(()) => Ok(message),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                // lost a race with a concurrent resend carrying the same client id
                let client_id = message.client_id.as_deref().unwrap_or_default();
                self.store
                    .find_by_client_id(room, client_id)
                    .await?
                    .ok_or_else(|| RelayError::Persistence(sqlx::Error::RowNotFound))
            }
            Err(e) => {
                tracing::warn!(room, id = %message.id, "broadcast succeeded but cache write failed");
                Err(e.into())
            }
        }
    }
}

/// Maps remote records into messages for `room`, oldest first.
/// Records without a chat body are skipped.
pub fn normalize(room: &str, remote: Vec<RemoteMessage>) -> Vec<Message> {
    let mut messages: Vec<Message> = remote
        .into_iter()
        .filter_map(|record| {
            let Some(body) = record.body() else {
                tracing::warn!(room, item_hash = %record.item_hash, "skipping remote message without body");
                return None;
            };
            Some(Message {
                content: body.to_string(),
                id: record.item_hash,
                room_id: room.to_string(),
                sender: record.sender,
                timestamp: epoch_seconds_to_datetime(record.time),
                client_id: None,
            })
        })
        .collect();
    messages.sort_by_key(|m| m.timestamp);
    messages
}
