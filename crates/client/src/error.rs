#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to relay failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid relay url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// True when the relay rejected the sender as unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }
}
