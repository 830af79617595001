//! Data transfer objects of the HTTP and WebSocket surfaces.
//!
//! `websocket` and `http` define the wire shapes, `conversion` the
//! builders from domain types. The client crate reuses these types for
//! its side of the protocol.

pub mod conversion;
pub mod http;
pub mod websocket;

pub use http::{HealthResponse, HistoryMessage, HistoryResponse};
pub use websocket::{ClientFrame, MessageData, ServerFrame};
