//! Kitchen service: menu catalogue

use crate::{ClientResult, HttpClient};
use shared::models::{AvailabilityUpdate, MenuItem, MenuItemCreate};

impl HttpClient {
    pub async fn menu(&self) -> ClientResult<Vec<MenuItem>> {
        self.get("/api/kitchen/menu").await
    }

    pub async fn create_menu_item(&self, item: &MenuItemCreate) -> ClientResult<serde_json::Value> {
        self.post("/api/kitchen/menu", item).await
    }

    pub async fn set_availability(&self, food_id: i64, availability: bool) -> ClientResult<serde_json::Value> {
        self.patch(
            &format!("/api/kitchen/menu/{food_id}"),
            &AvailabilityUpdate { availability },
        )
        .await
    }

    pub async fn delete_menu_item(&self, food_id: i64) -> ClientResult<serde_json::Value> {
        self.delete(&format!("/api/kitchen/menu/{food_id}")).await
    }
}
