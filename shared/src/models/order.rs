//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status
///
/// The order service and kitchen service use slightly different spellings;
/// the aliases fold them into one lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    #[serde(alias = "processing", alias = "cooking")]
    Preparing,
    #[serde(alias = "ready")]
    ReadyToServe,
    Served,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::ReadyToServe => "ready_to_serve",
            Self::Served => "served",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled orders never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| format!("unknown order status: {s}"))
    }
}

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(alias = "item_id", deserialize_with = "crate::util::lenient_i64")]
    pub food_id: i64,
    pub quantity: u32,
    /// Free-text note for the kitchen
    #[serde(default, alias = "notes", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Display name (kitchen queue payloads carry it, order service does not)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl OrderItem {
    pub fn new(food_id: i64, quantity: u32) -> Self {
        Self {
            food_id,
            quantity,
            note: None,
            name: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "id", deserialize_with = "crate::util::lenient_i64")]
    pub order_id: i64,
    #[serde(alias = "tableId", deserialize_with = "crate::util::lenient_i64")]
    pub table_id: i64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, alias = "status")]
    pub order_status: OrderStatus,
    #[serde(
        default,
        deserialize_with = "crate::util::lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "crate::util::lenient_i64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub employee_id: Option<i64>,
    /// Total in currency unit
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_price: Option<Decimal>,
}

impl Order {
    pub fn is_terminal(&self) -> bool {
        self.order_status.is_terminal()
    }

    /// Total in currency unit, zero when the service did not report one
    pub fn total(&self) -> Decimal {
        self.total_price.unwrap_or_default()
    }
}

/// Table total: sum of every non-cancelled order placed on `table_id`
pub fn table_total<'a>(orders: impl IntoIterator<Item = &'a Order>, table_id: i64) -> Decimal {
    orders
        .into_iter()
        .filter(|o| o.table_id == table_id && o.order_status != OrderStatus::Cancelled)
        .map(Order::total)
        .sum()
}

/// Place order payload (`POST /orders/`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub employee_id: i64,
    pub table_id: i64,
    pub items: Vec<OrderItem>,
    pub order_status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// Status change payload (`PUT /api/kitchen/orders/:id`, `PUT /orders/:id/status`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Acknowledgement returned by the order service for writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str_exact(raw).unwrap()
    }

    #[test]
    fn test_legacy_status_spellings() {
        for (raw, expected) in [
            ("processing", OrderStatus::Preparing),
            ("cooking", OrderStatus::Preparing),
            ("ready", OrderStatus::ReadyToServe),
            ("ready_to_serve", OrderStatus::ReadyToServe),
        ] {
            assert_eq!(raw.parse::<OrderStatus>().unwrap(), expected);
        }
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_from_order_service() {
        let body = r#"{
            "order_id": 42, "table_id": 5, "employee_id": 3,
            "order_status": "pending", "total_price": 125000.0,
            "created_at": "2024-03-05T18:30:00",
            "items": [{"order_item_id": 1, "order_id": 42, "food_id": 9, "quantity": 2, "note": null}]
        }"#;
        let order: Order = serde_json::from_str(body).unwrap();
        assert_eq!(order.order_id, 42);
        assert_eq!(order.items[0].food_id, 9);
        assert!(order.created_at.is_some());
        assert_eq!(order.total(), dec("125000"));
    }

    #[test]
    fn test_order_from_kitchen_queue() {
        let body = r#"{
            "order_id": "17", "table_id": "2", "status": "cooking",
            "items": [{"item_id": "4", "name": "Pho", "quantity": 1, "notes": "no onion"}]
        }"#;
        let order: Order = serde_json::from_str(body).unwrap();
        assert_eq!(order.order_id, 17);
        assert_eq!(order.order_status, OrderStatus::Preparing);
        assert_eq!(order.items[0].note.as_deref(), Some("no onion"));
        assert!(order.total_price.is_none());
    }

    #[test]
    fn test_table_total_skips_cancelled() {
        let mk = |id, table, status, total: Decimal| Order {
            order_id: id,
            table_id: table,
            items: vec![],
            order_status: status,
            created_at: None,
            employee_id: None,
            total_price: Some(total),
        };
        let orders = vec![
            mk(1, 7, OrderStatus::Pending, dec("10.5")),
            mk(2, 7, OrderStatus::Cancelled, dec("99")),
            mk(3, 7, OrderStatus::Completed, dec("4.5")),
            mk(4, 8, OrderStatus::Pending, dec("1")),
        ];
        assert_eq!(table_total(&orders, 7), dec("15"));
    }
}
