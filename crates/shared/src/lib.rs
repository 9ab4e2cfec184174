pub mod constants;
pub mod validation;
pub mod wire;

pub use wire::{Message, SendMessageRequest};
