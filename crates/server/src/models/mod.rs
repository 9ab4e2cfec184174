mod message;
mod user;

pub use message::*;
pub use user::*;

pub use desk_shared::{Message, SendMessageRequest};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}
