//! Chat server for Pavlac.
//!
//! The crate is split into layers: `domain` holds the chat model and the
//! seams to collaborating systems, `usecase` the application logic,
//! `infrastructure` the concrete adapters and wire DTOs, and `ui` the
//! Axum HTTP/WebSocket surface.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
