use std::sync::Arc;
use std::time::Duration;

use desk_shared::constants::POLL_INTERVAL_MS;
use desk_shared::Message;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::view::{Entry, RoomView};
use crate::{ClientError, RelayClient};

pub const POLL_INTERVAL: Duration = Duration::from_millis(POLL_INTERVAL_MS);

/// Keeps a [`RoomView`] in step with the relay and publishes every change.
pub struct Poller {
    client: RelayClient,
    room: String,
    view: Mutex<RoomView>,
    updates: watch::Sender<Vec<Entry>>,
}

impl Poller {
    pub fn new(client: RelayClient, room: impl Into<String>) -> Self {
        let room = room.into();
        let (updates, _) = watch::channel(Vec::new());
        Self {
            client,
            view: Mutex::new(RoomView::new(room.clone())),
            room,
            updates,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Entry>> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> Vec<Entry> {
        self.view.lock().await.entries().to_vec()
    }

    fn publish(&self, view: &RoomView) {
        self.updates.send_replace(view.entries().to_vec());
    }

    pub async fn poll_once(&self) -> Result<(), ClientError> {
        let messages = self.client.fetch_messages(&self.room).await?;
        let mut view = self.view.lock().await;
        view.apply_poll(messages);
        self.publish(&view);
        Ok(())
    }

    /// Shows the message immediately, then sends it. On failure the entry is
    /// marked failed and the error is returned for the caller to surface.
    pub async fn send(&self, content: &str, sender: &str) -> Result<Message, ClientError> {
        let request = {
            let mut view = self.view.lock().await;
            let request = view.compose(content, sender);
            self.publish(&view);
            request
        };

        let result = self.client.send_message(&self.room, &request).await;

        let mut view = self.view.lock().await;
        match result {
            Ok(message) => {
                view.confirm(message.clone());
                self.publish(&view);
                Ok(message)
            }
            Err(e) => {
                if let Some(client_id) = request.client_id.as_deref() {
                    view.fail(client_id);
                }
                self.publish(&view);
                tracing::warn!(room = %self.room, "send failed: {}", e);
                Err(e)
            }
        }
    }

    /// Polls every `interval` until the returned task is aborted. Poll errors
    /// are logged and the loop carries on.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.poll_once().await {
                    tracing::warn!(room = %self.room, "poll failed: {}", e);
                }
            }
        })
    }
}
