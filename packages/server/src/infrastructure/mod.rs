//! Concrete adapters behind the domain seams, plus the wire DTOs.

pub mod dto;
pub mod message_store;
pub mod notification_sink;
pub mod push_gateway;
pub mod session_store;
pub mod user_directory;

pub use message_store::InMemoryMessageStore;
pub use notification_sink::InMemoryNotificationSink;
pub use push_gateway::{HttpPushGateway, NoopPushGateway};
pub use session_store::InMemorySessionStore;
pub use user_directory::InMemoryUserDirectory;
