//! Payment Model

use serde::{Deserialize, Serialize};

/// Settle a table (`POST /orders/payments`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub table_id: i64,
    pub phone_number: String,
    pub customer_name: String,
}

/// Payment result.
///
/// The receipt layout belongs to the order service and is rendered as-is,
/// so it stays untyped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub receipt: Option<serde_json::Value>,
}
