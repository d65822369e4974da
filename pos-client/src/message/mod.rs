//! Real-time channel

pub mod gateway;

pub use gateway::{GatewayError, Handler, SocketGateway};
