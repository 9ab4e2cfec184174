//! Types exchanged between the relay and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message in a ticket room.
///
/// `id` is the remote network's item hash. `client_id` is the idempotency key
/// the composing client attached, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(rename = "queryId")]
    pub room_id: String,
    pub content: String,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Body of `POST /api/messages/{room}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_uses_query_id_on_the_wire() {
        let msg = Message {
            id: "abc".into(),
            room_id: "T1".into(),
            content: "hi".into(),
            sender: "alice".into(),
            timestamp: DateTime::from_timestamp(100, 0).unwrap(),
            client_id: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["queryId"], "T1");
        assert_eq!(json["timestamp"], "1970-01-01T00:01:40Z");
        assert!(json.get("clientId").is_none());
        assert!(json.get("roomId").is_none());
    }

    #[test]
    fn send_request_fields_are_optional() {
        let req: SendMessageRequest =
            serde_json::from_str(r#"{"content":"hi","sender":"alice"}"#).unwrap();
        assert!(req.timestamp.is_none());
        assert!(req.client_id.is_none());

        let req: SendMessageRequest = serde_json::from_str(
            r#"{"content":"hi","sender":"alice","timestamp":"2024-05-01T10:00:00Z","clientId":"c-1"}"#,
        )
        .unwrap();
        assert_eq!(req.client_id.as_deref(), Some("c-1"));
        assert_eq!(req.timestamp.unwrap().timestamp(), 1_714_557_600);
    }
}
