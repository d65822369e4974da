//! Shared types for the POS workspace
//!
//! Domain models, REST DTOs, real-time notification payloads and the
//! Socket.IO text codec, shared by every client crate.

pub mod client;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Notification re-exports (for convenient access)
pub use message::{MenuNotification, OrderNotification, Packet, TableNotification};
