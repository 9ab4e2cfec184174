//! Local cache of room messages.
//!
//! Append-only, no eviction. Every operation acquires its own connection from
//! the pool and returns it when done.

use sqlx::SqlitePool;

use crate::models::{Message, MessageRow};

#[derive(Clone)]
pub struct MessageStore {
    pool: SqlitePool,
}

impl MessageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Messages for `room`, timestamp ascending, ties in insertion order.
    pub async fn find_by_room(&self, room: &str) -> Result<Vec<Message>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT * FROM messages WHERE room_id = ? ORDER BY timestamp ASC, seq ASC",
        )
        .bind(room)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    pub async fn find_by_client_id(
        &self,
        room: &str,
        client_id: &str,
    ) -> Result<Option<Message>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, MessageRow>(
            "SELECT * FROM messages WHERE room_id = ? AND client_id = ?",
        )
        .bind(room)
        .bind(client_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row.map(Message::from))
    }

    pub async fn insert(&self, message: &Message) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        insert_row(&mut conn, message).await
    }

    /// Inserts all of `messages` in one transaction, in slice order.
    pub async fn insert_many(&self, messages: &[Message]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for message in messages {
            insert_row(&mut tx, message).await?;
        }
        tx.commit().await
    }
}

async fn insert_row(
    conn: &mut sqlx::SqliteConnection,
    message: &Message,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO messages (id, room_id, content, sender, timestamp, client_id) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&message.id)
    .bind(&message.room_id)
    .bind(&message.content)
    .bind(&message.sender)
    .bind(message.timestamp.timestamp_millis())
    .bind(&message.client_id)
    .execute(conn)
    .await?;
    Ok(())
}
