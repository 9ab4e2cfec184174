use chrono::{DateTime, Utc};
use desk_shared::Message;

/// Row shape of the `messages` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageRow {
    pub seq: i64,
    pub id: String,
    pub room_id: String,
    pub content: String,
    pub sender: String,
    pub timestamp: i64,
    pub client_id: Option<String>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            room_id: row.room_id,
            content: row.content,
            sender: row.sender,
            timestamp: millis_to_datetime(row.timestamp),
            client_id: row.client_id,
        }
    }
}

pub fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Converts the network's fractional epoch seconds to a UTC timestamp,
/// truncated to millisecond precision.
pub fn epoch_seconds_to_datetime(seconds: f64) -> DateTime<Utc> {
    millis_to_datetime((seconds * 1000.0) as i64)
}
