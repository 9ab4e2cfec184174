use std::collections::HashSet;

use chrono::Utc;
use desk_shared::{Message, SendMessageRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Shown optimistically; the relay has not answered yet.
    Pending,
    Confirmed,
    /// The send failed. The entry stays visible.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub message: Message,
    pub status: DeliveryStatus,
}

/// What an operator sees for one room.
///
/// Locally composed messages are identified by their client id until the
/// relay confirms them; confirmation and poll results replace them instead of
/// appending a second copy. A locally composed entry is kept until a poll
/// result lists its client id, so a poll that started before the send cannot
/// hide it.
#[derive(Debug, Clone)]
pub struct RoomView {
    room: String,
    entries: Vec<Entry>,
    /// Client ids that some poll result has already listed.
    polled: HashSet<String>,
}

impl RoomView {
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            entries: Vec::new(),
            polled: HashSet::new(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Appends a pending entry and returns the request to send for it.
    pub fn compose(&mut self, content: &str, sender: &str) -> SendMessageRequest {
        let client_id = uuid::Uuid::new_v4().to_string();
        let timestamp = Utc::now();

        self.entries.push(Entry {
            message: Message {
                id: client_id.clone(),
                room_id: self.room.clone(),
                content: content.to_string(),
                sender: sender.to_string(),
                timestamp,
                client_id: Some(client_id.clone()),
            },
            status: DeliveryStatus::Pending,
        });

        SendMessageRequest {
            content: content.to_string(),
            sender: sender.to_string(),
            timestamp: Some(timestamp),
            client_id: Some(client_id),
        }
    }

    /// Replaces the optimistic entry for `message.client_id` with the
    /// confirmed message. Unknown confirmations are inserted.
    pub fn confirm(&mut self, message: Message) {
        let slot = message.client_id.as_deref().and_then(|cid| {
            self.entries
                .iter()
                .position(|e| e.message.client_id.as_deref() == Some(cid))
        });
        let already_listed = self.entries.iter().any(|e| {
            e.status == DeliveryStatus::Confirmed && e.message.id == message.id
        });

        match slot {
            Some(i) => {
                self.entries[i] = Entry {
                    message,
                    status: DeliveryStatus::Confirmed,
                };
            }
            None if !already_listed => {
                self.entries.push(Entry {
                    message,
                    status: DeliveryStatus::Confirmed,
                });
            }
            None => {}
        }
        self.sort();
    }

    pub fn fail(&mut self, client_id: &str) {
        for entry in &mut self.entries {
            if entry.status == DeliveryStatus::Pending
                && entry.message.client_id.as_deref() == Some(client_id)
            {
                entry.status = DeliveryStatus::Failed;
            }
        }
    }

    /// Rebuilds the view from a poll result, keeping local entries the relay
    /// has not listed yet.
    pub fn apply_poll(&mut self, messages: Vec<Message>) {
        let listed: HashSet<String> = messages
            .iter()
            .filter_map(|m| m.client_id.clone())
            .collect();

        let polled = &self.polled;
        let local: Vec<Entry> = self
            .entries
            .drain(..)
            .filter(|e| match e.message.client_id.as_deref() {
                // entries from an earlier poll are superseded by this one
                Some(cid) => !listed.contains(cid) && !polled.contains(cid),
                None => e.status != DeliveryStatus::Confirmed,
            })
            .collect();
        self.polled.extend(listed);

        self.entries = messages
            .into_iter()
            .map(|message| Entry {
                message,
                status: DeliveryStatus::Confirmed,
            })
            .chain(local)
            .collect();
        self.sort();
    }

    fn sort(&mut self) {
        self.entries.sort_by_key(|e| e.message.timestamp);
    }
}
