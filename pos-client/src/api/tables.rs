//! Order service: dining tables

use crate::{ClientResult, HttpClient};
use shared::models::{DiningTable, TableListResponse, TableStatus, TableStatusUpdate};

impl HttpClient {
    pub async fn list_tables(&self) -> ClientResult<Vec<DiningTable>> {
        let list: TableListResponse = self.get("/orders/tables").await?;
        Ok(list.into_tables())
    }

    /// Raw status write. Only reachable through a confirmed
    /// [`PendingTransition`](crate::tables::PendingTransition).
    pub(crate) async fn update_table_status(
        &self,
        table_id: i64,
        status: TableStatus,
    ) -> ClientResult<serde_json::Value> {
        let body = TableStatusUpdate {
            table_status: status,
        };
        self.put(&format!("/orders/tables/{table_id}"), &body).await
    }
}
