//! Typed REST endpoints
//!
//! Each module extends [`HttpClient`](crate::HttpClient) with the calls of
//! one backend service, as routed by the API gateway.

pub mod auth;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod reports;
pub mod tables;
pub mod users;
