//! User service: staff accounts

use crate::{ClientResult, HttpClient};
use shared::models::{StaffAccount, StaffCreate, StaffUpdate};

impl HttpClient {
    pub async fn list_staff(&self) -> ClientResult<Vec<StaffAccount>> {
        self.get("/api/users/users").await
    }

    pub async fn create_staff(&self, staff: &StaffCreate) -> ClientResult<StaffAccount> {
        self.post("/api/users/users", staff).await
    }

    pub async fn update_staff(&self, user_id: i64, update: &StaffUpdate) -> ClientResult<StaffAccount> {
        self.put(&format!("/api/users/users/{user_id}"), update).await
    }

    pub async fn delete_staff(&self, user_id: i64) -> ClientResult<serde_json::Value> {
        self.delete(&format!("/api/users/users/{user_id}")).await
    }

    /// Look up the account behind `mail` (case-insensitive)
    pub async fn find_staff_by_mail(&self, mail: &str) -> ClientResult<Option<StaffAccount>> {
        let staff = self.list_staff().await?;
        Ok(staff
            .into_iter()
            .find(|account| account.mail.eq_ignore_ascii_case(mail)))
    }
}
