use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{OrderItem, OrderStatus, TableStatus};

// ==================== Order Notifications ====================

/// A freshly placed order, pushed to every kitchen and waiter screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderNotice {
    #[serde(deserialize_with = "crate::util::lenient_i64")]
    pub order_id: i64,
    #[serde(alias = "tableId", deserialize_with = "crate::util::lenient_i64")]
    pub table_id: i64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(
        default,
        deserialize_with = "crate::util::lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Partial update of an existing order.
///
/// Only the fields that are `Some` are applied; everything else on the
/// target order is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdateNotice {
    #[serde(alias = "orderId", deserialize_with = "crate::util::lenient_i64")]
    pub order_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(
        default,
        deserialize_with = "crate::util::lenient_i64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub table_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_price: Option<Decimal>,
}

/// Order notification carried on `order_update` / `update_order`.
///
/// `type` is the single mandatory discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderNotification {
    NewOrder(NewOrderNotice),
    StatusUpdate(StatusUpdateNotice),
}

impl OrderNotification {
    /// Status-only update, the shape kitchen and waiter screens emit
    pub fn status_update(order_id: i64, status: OrderStatus) -> Self {
        Self::StatusUpdate(StatusUpdateNotice {
            order_id,
            status: Some(status),
            ..Default::default()
        })
    }

    pub fn order_id(&self) -> i64 {
        match self {
            Self::NewOrder(n) => n.order_id,
            Self::StatusUpdate(u) => u.order_id,
        }
    }
}

// ==================== Menu / Table Notifications ====================

/// Availability flip of one menu item (`menu_update` / `update_menu`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNotification {
    #[serde(
        alias = "itemId",
        alias = "item_id",
        deserialize_with = "crate::util::lenient_i64"
    )]
    pub food_id: i64,
    pub availability: bool,
}

/// Table status change (`table_update` / `update_table`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableNotification {
    #[serde(alias = "tableId", deserialize_with = "crate::util::lenient_i64")]
    pub table_id: i64,
    pub status: TableStatus,
    #[serde(
        default,
        deserialize_with = "crate::util::lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}
