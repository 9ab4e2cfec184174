pub const APP_NAME: &str = "Desk Relay";

// Remote network
pub const DEFAULT_CHANNEL: &str = "BANKADMIN";
pub const ROOM_TAG_PREFIX: &str = "room:";
pub const CHAT_CONTENT_TYPE: &str = "chat";

// Limits
pub const MAX_MESSAGE_LENGTH: usize = 4000;
pub const MAX_ROOM_ID_LENGTH: usize = 128;
pub const MAX_USERNAME_LENGTH: usize = 32;
pub const MIN_USERNAME_LENGTH: usize = 2;
pub const MIN_PASSWORD_LENGTH: usize = 8;

// Client
pub const POLL_INTERVAL_MS: u64 = 5_000;

pub const SESSION_COOKIE: &str = "desk.session_token";

/// Tag attached to every remote post for a room.
pub fn room_tag(room: &str) -> String {
    format!("{}{}", ROOM_TAG_PREFIX, room)
}
