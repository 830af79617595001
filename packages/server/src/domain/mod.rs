//! Domain model of the chat subsystem.

pub mod entity;
pub mod notifications;
pub mod push;
pub mod registry;
pub mod session;
pub mod store;
pub mod users;
pub mod value_object;

pub use entity::{ChatMessage, UserProfile};
pub use notifications::{ActivityEntry, Notification, NotificationSink, SinkError};
pub use push::{PushError, PushGateway};
pub use registry::{
    ConnectionRegistry, FrameSender, OfflineNotice, SEND_QUEUE_CAPACITY, frame_channel,
};
pub use session::SessionStore;
pub use store::{MessageStore, StoreError};
pub use users::UserDirectory;
pub use value_object::{
    ConnectionId, MAX_MESSAGE_CONTENT_LENGTH, MessageContent, MessageId, Timestamp, UserId,
    ValueObjectError,
};
