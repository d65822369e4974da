//! OrderQueue - 订单队列
//!
//! Merges a REST snapshot with socket notifications into the list shown on
//! kitchen and waiter screens. Newly pushed orders carry a short highlight.
//!
//! Conflict policy is last-write-wins: a status update is applied even if it
//! moves an order backwards in its lifecycle.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use shared::message::{NewOrderNotice, OrderNotification, StatusUpdateNotice};
use shared::models::{Order, table_total};
use std::collections::HashMap;

/// How long a freshly pushed order stays highlighted
pub const HIGHLIGHT_SECS: i64 = 5;

/// Effect of one notification on the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// New order added
    Appended,
    /// New order whose id is already present; ignored
    Duplicate,
    /// Status update merged into an existing order
    Merged,
    /// Update for an unknown order, or an undecodable payload
    Dropped,
}

#[derive(Debug, Default, Clone)]
pub struct OrderQueue {
    orders: Vec<Order>,
    /// order_id -> highlight expiry
    highlights: HashMap<i64, DateTime<Utc>>,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_orders(orders: Vec<Order>) -> Self {
        let mut queue = Self::new();
        queue.replace_baseline(orders);
        queue
    }

    /// Swap in a REST snapshot (initial fetch or manual refresh)
    pub fn replace_baseline(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        let orders = &self.orders;
        self.highlights
            .retain(|id, _| orders.iter().any(|o| o.order_id == *id));
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, order_id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn apply(&mut self, notification: OrderNotification) -> Applied {
        self.apply_at(notification, Utc::now())
    }

    pub fn apply_at(&mut self, notification: OrderNotification, now: DateTime<Utc>) -> Applied {
        match notification {
            OrderNotification::NewOrder(notice) => self.append(notice, now),
            OrderNotification::StatusUpdate(update) => self.merge(update),
        }
    }

    /// Decode a wire payload (tagged or legacy) and apply it.
    /// Undecodable payloads are dropped.
    pub fn apply_raw(&mut self, value: &Value) -> Applied {
        match OrderNotification::decode(value) {
            Some(notification) => self.apply(notification),
            None => Applied::Dropped,
        }
    }

    fn append(&mut self, notice: NewOrderNotice, now: DateTime<Utc>) -> Applied {
        if self.get(notice.order_id).is_some() {
            tracing::debug!(order_id = notice.order_id, "Duplicate new order ignored");
            return Applied::Duplicate;
        }
        self.highlights
            .insert(notice.order_id, now + Duration::seconds(HIGHLIGHT_SECS));
        self.orders.push(Order {
            order_id: notice.order_id,
            table_id: notice.table_id,
            items: notice.items,
            order_status: notice.status,
            created_at: notice.timestamp,
            employee_id: None,
            total_price: None,
        });
        Applied::Appended
    }

    fn merge(&mut self, update: StatusUpdateNotice) -> Applied {
        let Some(order) = self.orders.iter_mut().find(|o| o.order_id == update.order_id) else {
            tracing::debug!(order_id = update.order_id, "Update for unknown order dropped");
            return Applied::Dropped;
        };
        if let Some(status) = update.status {
            order.order_status = status;
        }
        if let Some(table_id) = update.table_id {
            order.table_id = table_id;
        }
        if let Some(items) = update.items {
            order.items = items;
        }
        if let Some(total) = update.total_price {
            order.total_price = Some(total);
        }
        Applied::Merged
    }

    pub fn is_highlighted(&self, order_id: i64, now: DateTime<Utc>) -> bool {
        self.highlights
            .get(&order_id)
            .is_some_and(|expiry| now < *expiry)
    }

    /// Drop highlights whose window has passed; returns how many were cleared
    pub fn expire_highlights(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.highlights.len();
        self.highlights.retain(|_, expiry| now < *expiry);
        before - self.highlights.len()
    }

    /// Oldest first; orders without a timestamp count as `now`
    pub fn sorted(&self, now: DateTime<Utc>) -> Vec<&Order> {
        let mut view: Vec<&Order> = self.orders.iter().collect();
        view.sort_by_key(|o| o.created_at.unwrap_or(now));
        view
    }

    /// Orders that are neither completed nor cancelled
    pub fn active(&self) -> Vec<&Order> {
        self.orders.iter().filter(|o| !o.is_terminal()).collect()
    }

    pub fn table_total(&self, table_id: i64) -> Decimal {
        table_total(&self.orders, table_id)
    }
}
