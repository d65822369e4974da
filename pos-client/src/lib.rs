//! POS Client - restaurant point-of-service client core
//!
//! REST access to the order, kitchen, user and reporting services, the
//! Socket.IO notification channel, and the client-side state that sits
//! between them (table board, order queue, cart, session).

pub mod api;
pub mod cart;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod message;
pub mod reconciler;
pub mod session;
pub mod tables;

pub use client::PosClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorDisposition};
pub use http::HttpClient;

// Message types and gateway
pub use message::{GatewayError, SocketGateway};
pub use shared::message::{MenuNotification, OrderNotification, TableNotification};
