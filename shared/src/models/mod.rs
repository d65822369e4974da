//! Data models
//!
//! Wire types of the order, kitchen, user and reporting services.
//! Identifiers are `i64`; services that send them as strings are folded
//! in by [`crate::util`].

pub mod dining_table;
pub mod menu;
pub mod order;
pub mod payment;
pub mod report;
pub mod staff;

// Re-exports
pub use dining_table::*;
pub use menu::*;
pub use order::*;
pub use payment::*;
pub use report::*;
pub use staff::*;
