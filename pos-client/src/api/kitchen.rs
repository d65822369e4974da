//! Kitchen service: order queue

use crate::{ClientResult, HttpClient};
use shared::models::{Order, OrderStatus, OrderStatusUpdate};

impl HttpClient {
    /// Kitchen queue snapshot
    pub async fn kitchen_orders(&self) -> ClientResult<Vec<Order>> {
        self.get("/api/kitchen/orders").await
    }

    pub async fn kitchen_order(&self, order_id: i64) -> ClientResult<Order> {
        self.get(&format!("/api/kitchen/orders/{order_id}")).await
    }

    /// Kitchen-side status change (preparing, ready_to_serve, ...)
    pub async fn update_kitchen_order(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> ClientResult<serde_json::Value> {
        self.put(
            &format!("/api/kitchen/orders/{order_id}"),
            &OrderStatusUpdate { status },
        )
        .await
    }
}
