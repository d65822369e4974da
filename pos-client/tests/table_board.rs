// pos-client/tests/table_board.rs
// 桌台状态机集成测试

mod support;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use pos_client::error::NETWORK_BANNER;
use pos_client::tables::{TableAction, TableBoard};
use pos_client::{ClientConfig, ClientError, ErrorDisposition, HttpClient, TableNotification};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Clone, Default)]
struct OrderService {
    tables: Arc<Mutex<Vec<Value>>>,
    writes: Arc<Mutex<Vec<(i64, Value)>>>,
    payments: Arc<Mutex<Vec<Value>>>,
}

impl OrderService {
    fn with_tables(tables: Value) -> Self {
        let service = Self::default();
        *service.tables.lock() = tables.as_array().cloned().unwrap_or_default();
        service
    }

    fn status_of(&self, table_id: i64) -> Option<String> {
        self.tables
            .lock()
            .iter()
            .find(|t| t["table_id"] == table_id)
            .and_then(|t| t["table_status"].as_str().map(str::to_string))
    }
}

async fn list_tables(State(svc): State<OrderService>) -> Json<Value> {
    Json(Value::Array(svc.tables.lock().clone()))
}

async fn update_table(
    State(svc): State<OrderService>,
    Path(table_id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    svc.writes.lock().push((table_id, body.clone()));
    let mut tables = svc.tables.lock();
    match tables.iter_mut().find(|t| t["table_id"] == table_id) {
        Some(table) => {
            table["table_status"] = body["table_status"].clone();
            (StatusCode::OK, Json(table.clone()))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Table not found"})),
        ),
    }
}

async fn conflict(
    State(svc): State<OrderService>,
    Path(table_id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    svc.writes.lock().push((table_id, body));
    (
        StatusCode::CONFLICT,
        Json(json!({"detail": {"detail": "Table 7 is already occupied"}})),
    )
}

async fn release_fails(Path(_table_id): Path<i64>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": "db down"})),
    )
}

async fn pay(State(svc): State<OrderService>, Json(body): Json<Value>) -> Json<Value> {
    svc.payments.lock().push(body);
    Json(json!({"message": "Payment successful", "receipt": {"total": 125000.0}}))
}

fn order_service(svc: OrderService) -> Router {
    Router::new()
        .route("/orders/tables", get(list_tables))
        .route("/orders/tables/{table_id}", put(update_table))
        .route("/orders/payments", post(pay))
        .with_state(svc)
}

fn tables_fixture() -> Value {
    json!([
        {"table_id": 7, "table_status": "available", "capacity": 4},
        {"table_id": 3, "table_status": "occupied", "capacity": 2},
        {"table_id": 9, "table_status": "reserved", "capacity": 6}
    ])
}

async fn client_for(base_url: String) -> HttpClient {
    ClientConfig::new(base_url)
        .build_http_client()
        .unwrap()
        .with_token("tok")
}

#[tokio::test]
async fn test_confirmed_occupy_writes_then_reloads() {
    let svc = OrderService::with_tables(tables_fixture());
    let api = client_for(support::serve(order_service(svc.clone())).await).await;

    let mut board = TableBoard::load(&api).await.unwrap();
    assert_eq!(board.tables().len(), 3);

    let pending = board.request(7, TableAction::Occupy).unwrap();
    board.confirm(pending, &api).await.unwrap();

    assert_eq!(
        svc.writes.lock().as_slice(),
        &[(7, json!({"table_status": "occupied"}))]
    );
    assert_eq!(
        board.get(7).unwrap().table_status,
        shared::models::TableStatus::Occupied
    );
}

#[tokio::test]
async fn test_conflict_shows_server_detail_and_keeps_board() {
    let svc = OrderService::with_tables(tables_fixture());
    let app = Router::new()
        .route("/orders/tables", get(list_tables))
        .route("/orders/tables/{table_id}", put(conflict))
        .with_state(svc.clone());
    let api = client_for(support::serve(app).await).await;

    let mut board = TableBoard::load(&api).await.unwrap();
    let pending = board.request(7, TableAction::Occupy).unwrap();
    let err = board.confirm(pending, &api).await.unwrap_err();

    assert!(matches!(err, ClientError::Server { status: 409, .. }));
    assert_eq!(
        err.disposition(),
        ErrorDisposition::Banner("Table 7 is already occupied".into())
    );
    assert_eq!(
        board.get(7).unwrap().table_status,
        shared::models::TableStatus::Available
    );
}

#[tokio::test]
async fn test_dismissed_dialog_sends_nothing() {
    let svc = OrderService::with_tables(tables_fixture());
    let api = client_for(support::serve(order_service(svc.clone())).await).await;

    let board = TableBoard::load(&api).await.unwrap();
    let pending = board.request(7, TableAction::Occupy).unwrap();
    board.dismiss(pending);

    assert!(svc.writes.lock().is_empty());
    assert_eq!(svc.status_of(7).as_deref(), Some("available"));
}

#[tokio::test]
async fn test_settle_pays_then_releases() {
    let svc = OrderService::with_tables(tables_fixture());
    let api = client_for(support::serve(order_service(svc.clone())).await).await;

    let mut board = TableBoard::load(&api).await.unwrap();
    let pending = board.request_payment(3).unwrap();
    let settlement = board
        .settle(pending, "Minh", "0901234567", &api)
        .await
        .unwrap();

    assert!(settlement.is_released());
    assert_eq!(
        settlement.receipt.message.as_deref(),
        Some("Payment successful")
    );
    assert_eq!(
        svc.payments.lock().as_slice(),
        &[json!({"table_id": 3, "phone_number": "0901234567", "customer_name": "Minh"})]
    );
    assert_eq!(svc.status_of(3).as_deref(), Some("available"));
    assert_eq!(
        board.get(3).unwrap().table_status,
        shared::models::TableStatus::Available
    );
}

#[tokio::test]
async fn test_failed_release_still_returns_receipt() {
    let svc = OrderService::with_tables(tables_fixture());
    let app = Router::new()
        .route("/orders/tables", get(list_tables))
        .route("/orders/tables/{table_id}", put(release_fails))
        .route("/orders/payments", post(pay))
        .with_state(svc.clone());
    let api = client_for(support::serve(app).await).await;

    let mut board = TableBoard::load(&api).await.unwrap();
    let pending = board.request_payment(3).unwrap();
    let settlement = board
        .settle(pending, "Minh", "0901234567", &api)
        .await
        .unwrap();

    assert_eq!(
        settlement.receipt.message.as_deref(),
        Some("Payment successful")
    );
    assert!(matches!(
        settlement.release_error,
        Some(ClientError::Server { status: 500, ref detail }) if detail == "db down"
    ));
    assert_eq!(svc.payments.lock().len(), 1);
    assert_eq!(
        board.get(3).unwrap().table_status,
        shared::models::TableStatus::Occupied
    );
}

#[tokio::test]
async fn test_confirm_rechecks_status_after_push() {
    let svc = OrderService::with_tables(tables_fixture());
    let api = client_for(support::serve(order_service(svc.clone())).await).await;

    let mut board = TableBoard::load(&api).await.unwrap();
    let pending = board.request(7, TableAction::Occupy).unwrap();

    // Another waiter seated table 7 while the dialog was open
    board.apply(&TableNotification {
        table_id: 7,
        status: shared::models::TableStatus::Occupied,
        timestamp: None,
    });
    let err = board.confirm(pending, &api).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(svc.writes.lock().is_empty());
}

#[tokio::test]
async fn test_settle_requires_customer_details() {
    let svc = OrderService::with_tables(tables_fixture());
    let api = client_for(support::serve(order_service(svc.clone())).await).await;

    let mut board = TableBoard::load(&api).await.unwrap();
    let pending = board.request_payment(3).unwrap();
    let err = board.settle(pending, "", "0901", &api).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(svc.payments.lock().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_banner() {
    let api = client_for(support::dead_url().await).await;
    let err = TableBoard::load(&api).await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(
        err.disposition(),
        ErrorDisposition::Banner(NETWORK_BANNER.into())
    );
}

#[tokio::test]
async fn test_expired_token_means_logout() {
    let app = Router::new().route(
        "/orders/tables",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Could not validate credentials"})),
            )
        }),
    );
    let api = client_for(support::serve(app).await).await;
    let err = TableBoard::load(&api).await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(err.disposition(), ErrorDisposition::Logout);
}
