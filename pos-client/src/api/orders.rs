//! Order service: orders

use crate::{ClientResult, HttpClient};
use shared::models::{NewOrder, Order, OrderAck, OrderStatus, OrderStatusUpdate};

impl HttpClient {
    /// Place an order (`POST /orders/`)
    pub async fn place_order(&self, order: &NewOrder) -> ClientResult<OrderAck> {
        self.post("/orders/", order).await
    }

    /// Waiter's active orders
    pub async fn active_orders(&self) -> ClientResult<Vec<Order>> {
        self.get("/orders/active").await
    }

    /// Waiter-side status change (e.g. served)
    pub async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<OrderAck> {
        self.put(
            &format!("/orders/{order_id}/status"),
            &OrderStatusUpdate { status },
        )
        .await
    }
}
