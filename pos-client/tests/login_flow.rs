// pos-client/tests/login_flow.rs
// 登录 / 会话集成测试

mod support;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use pos_client::cart::Cart;
use pos_client::session::{FileSessionStore, Route, SessionStore};
use pos_client::{ClientConfig, ClientError, ErrorDisposition, PosClient};
use serde_json::{Value, json};
use shared::models::Role;
use std::sync::Arc;
use tempfile::TempDir;

const TOKEN: &str = "tok-waiter";

fn user_service(order_posts: Arc<Mutex<Vec<Value>>>) -> Router {
    Router::new()
        .route(
            "/api/users/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "secret" {
                    (
                        StatusCode::OK,
                        Json(json!({"access_token": TOKEN, "token_type": "bearer"})),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"detail": "Incorrect email or password"})),
                    )
                }
            }),
        )
        .route(
            "/api/users/users",
            get(|headers: HeaderMap| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some(format!("Bearer {TOKEN}").as_str());
                if !authorized {
                    return (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"detail": "Not authenticated"})),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!([
                        {"user_id": 1, "name": "Hoa", "mail": "hoa@pos.vn", "role": "management"},
                        {"user_id": 3, "name": "Lan", "mail": "lan@pos.vn", "role": "waiter"}
                    ])),
                )
            }),
        )
        .route(
            "/orders/",
            post(move |Json(body): Json<Value>| {
                let posts = order_posts.clone();
                async move {
                    posts.lock().push(body);
                    Json(json!({"message": "Order created", "order": {"order_id": 1}}))
                }
            }),
        )
}

async fn start() -> (String, Arc<Mutex<Vec<Value>>>) {
    let posts = Arc::new(Mutex::new(Vec::new()));
    let url = support::serve(user_service(posts.clone())).await;
    (url, posts)
}

fn config(url: &str) -> ClientConfig {
    // Socket endpoint points nowhere useful; keep retries quiet
    ClientConfig::new(url).with_reconnect(1, std::time::Duration::from_secs(60))
}

#[tokio::test]
async fn test_login_resolves_account_and_persists_session() {
    let (url, _) = start().await;
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path()));

    let mut client = PosClient::with_store(config(&url), store.clone()).unwrap();
    let session = client.login("LAN@pos.vn", "secret").await.unwrap();
    assert_eq!(session.user_id, 3);
    assert_eq!(session.role, Role::Waiter);
    assert_eq!(session.token, TOKEN);

    assert_eq!(client.home(), Route::WaiterDashboard);
    assert_eq!(client.route(Role::Manager), Route::Login);
    assert_eq!(client.http().token(), Some(TOKEN));

    // A fresh client picks the session back up from disk
    let mut resumed = PosClient::with_store(config(&url), store).unwrap();
    let restored = resumed.restore().await.unwrap().cloned();
    assert_eq!(restored.map(|s| s.user_name), Some("Lan".to_string()));
}

#[tokio::test]
async fn test_manager_alias_maps_to_manager_dashboard() {
    let (url, _) = start().await;
    let mut client = PosClient::new(config(&url)).unwrap();
    client.login("hoa@pos.vn", "secret").await.unwrap();
    assert_eq!(client.home(), Route::ManagerDashboard);
}

#[tokio::test]
async fn test_unknown_account() {
    let (url, _) = start().await;
    let mut client = PosClient::new(config(&url)).unwrap();
    let err = client.login("ghost@pos.vn", "secret").await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound(ref m) if m == "Account does not exist"));
    assert!(client.session().is_none());
}

#[tokio::test]
async fn test_wrong_password_and_blank_fields() {
    let (url, _) = start().await;
    let mut client = PosClient::new(config(&url)).unwrap();

    let err = client.login("lan@pos.vn", "nope").await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 401, .. }));
    assert_eq!(
        client.handle_error(&err).await,
        ErrorDisposition::Banner("Incorrect email or password".into())
    );
    assert!(client.session().is_none());

    let err = client.login("  ", "secret").await.unwrap_err();
    assert!(matches!(err.disposition(), ErrorDisposition::Inline(_)));
}

#[tokio::test]
async fn test_unauthorized_error_clears_session() {
    let (url, _) = start().await;
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path()));
    let mut client = PosClient::with_store(config(&url), store.clone()).unwrap();
    client.login("lan@pos.vn", "secret").await.unwrap();

    let disposition = client.handle_error(&ClientError::Unauthorized).await;
    assert_eq!(disposition, ErrorDisposition::Logout);
    assert!(client.session().is_none());
    assert!(client.http().token().is_none());
    assert_eq!(client.home(), Route::Login);
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_cart_never_reaches_server() {
    let (url, posts) = start().await;
    let mut client = PosClient::new(config(&url)).unwrap();
    client.login("lan@pos.vn", "secret").await.unwrap();

    let err = client.place_order(&Cart::new(), 7).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(posts.lock().is_empty());
}

#[tokio::test]
async fn test_place_order_sends_waiter_as_employee() {
    let (url, posts) = start().await;
    let mut client = PosClient::new(config(&url)).unwrap();
    client.login("lan@pos.vn", "secret").await.unwrap();

    let dish: shared::models::MenuItem = serde_json::from_value(json!({
        "food_id": "12", "name": "Lau Thai", "category": "SoupBase", "price": 250000.0
    }))
    .unwrap();
    let mut cart = Cart::new();
    cart.add(&dish).unwrap();
    cart.add(&dish).unwrap();

    client.place_order(&cart, 7).await.unwrap();

    let posts = posts.lock();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["employee_id"], 3);
    assert_eq!(posts[0]["table_id"], 7);
    assert_eq!(posts[0]["order_status"], "pending");
    assert_eq!(posts[0]["items"][0]["food_id"], 12);
    assert_eq!(posts[0]["items"][0]["quantity"], 2);
    assert_eq!(posts[0]["total_price"], 500000.0);
}

#[tokio::test]
async fn test_corrupt_session_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path());
    std::fs::write(store.path(), "{not json").unwrap();
    assert!(store.load().await.unwrap().is_none());
    store.clear().await.unwrap();
    store.clear().await.unwrap();
}
