//! Client side of the desk relay: an HTTP client, an in-memory room view with
//! optimistic sends, and a poller that keeps the view fresh.

pub mod error;
pub mod http;
pub mod poller;
pub mod view;

pub use error::ClientError;
pub use http::RelayClient;
pub use poller::Poller;
pub use view::{DeliveryStatus, Entry, RoomView};
