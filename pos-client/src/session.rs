//! Session - 员工会话
//!
//! The logged-in staff member, its persistence, and role-based routing.
//! Tokens are opaque here; expiry is left to the server (a 401 ends the
//! session through [`crate::ErrorDisposition::Logout`]).

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared::models::{Role, StaffAccount};
use std::path::{Path, PathBuf};

use crate::{ClientError, ClientResult};

/// 员工会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(rename = "userRole")]
    pub role: Role,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

impl Session {
    pub fn new(token: impl Into<String>, account: &StaffAccount) -> Self {
        Self {
            token: token.into(),
            role: account.role,
            user_name: account.name.clone(),
            user_id: account.user_id,
        }
    }
}

/// Screen a session lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    ManagerDashboard,
    WaiterDashboard,
    KitchenDashboard,
}

impl Route {
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Manager => Self::ManagerDashboard,
            Role::Waiter => Self::WaiterDashboard,
            Role::Kitchen => Self::KitchenDashboard,
        }
    }
}

/// Guard for a role-restricted screen: no session or the wrong role goes
/// back to login.
pub fn route_for(session: Option<&Session>, required: Role) -> Route {
    match session {
        Some(s) if s.role == required => Route::dashboard_for(required),
        _ => Route::Login,
    }
}

/// Session persistence
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> ClientResult<Option<Session>>;
    async fn save(&self, session: &Session) -> ClientResult<()>;
    async fn clear(&self) -> ClientResult<()>;
}

/// Process-lifetime store (the browser tab analogue)
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> ClientResult<Option<Session>> {
        Ok(self.current.lock().clone())
    }

    async fn save(&self, session: &Session) -> ClientResult<()> {
        *self.current.lock() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        self.current.lock().take();
        Ok(())
    }
}

/// JSON file store: `{dir}/session.json`
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    file_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            file_path: dir.join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

fn io_err(e: std::io::Error) -> ClientError {
    ClientError::Session(e.to_string())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> ClientResult<Option<Session>> {
        let content = match tokio::fs::read_to_string(&self.file_path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(e)),
        };
        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // 损坏的会话文件等同于未登录
                tracing::warn!(path = %self.file_path.display(), "Discarding corrupt session file: {e}");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.file_path, content)
            .await
            .map_err(io_err)
    }

    async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waiter() -> Session {
        Session {
            token: "jwt".into(),
            role: Role::Waiter,
            user_name: "Lan".into(),
            user_id: 3,
        }
    }

    #[test]
    fn test_route_guard() {
        let session = waiter();
        assert_eq!(route_for(None, Role::Waiter), Route::Login);
        assert_eq!(route_for(Some(&session), Role::Manager), Route::Login);
        assert_eq!(
            route_for(Some(&session), Role::Waiter),
            Route::WaiterDashboard
        );
    }

    #[test]
    fn test_browser_storage_keys() {
        let value = serde_json::to_value(waiter()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"token": "jwt", "userRole": "waiter", "userName": "Lan", "userId": 3})
        );
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.load().await.unwrap().is_none());
        store.save(&waiter()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(waiter()));
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
