use desk_shared::{Message, SendMessageRequest};
use url::Url;

use crate::ClientError;

#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
        })
    }

    fn room_url(&self, room: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.join("api/messages/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(room);
        Ok(url)
    }

    pub async fn fetch_messages(&self, room: &str) -> Result<Vec<Message>, ClientError> {
        let res = self.http.get(self.room_url(room)?).send().await?;
        let res = check_status(res).await?;
        Ok(res.json().await?)
    }

    pub async fn send_message(
        &self,
        room: &str,
        request: &SendMessageRequest,
    ) -> Result<Message, ClientError> {
        let res = self
            .http
            .post(self.room_url(room)?)
            .json(request)
            .send()
            .await?;
        let res = check_status(res).await?;
        Ok(res.json().await?)
    }
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    // the relay reports {"error": "..."}; fall back to the raw body
    let text = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(text);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
