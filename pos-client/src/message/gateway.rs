//! SocketGateway - Socket.IO 实时通道
//!
//! One logical connection per gateway:
//! 1. Connect WebSocket (`/socket.io/?EIO=4&transport=websocket`)
//! 2. Engine.IO open, then Socket.IO CONNECT with `{"token": ...}`
//! 3. Select loop: inbound events → handlers, outbound queue → server,
//!    Engine.IO ping → pong
//! 4. Reconnect with a fixed delay, up to the configured attempts per outage

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use shared::message::{
    MenuNotification, OpenPayload, OrderNotification, Packet, PacketError, TableNotification,
    event,
};
use shared::models::{OrderStatus, TableStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::{Notify, mpsc};
use tokio::time::{Duration, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::ClientConfig;

/// Outbound frames buffered while a session is live
const OUTBOUND_BUFFER: usize = 256;

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Handler for one inbound event kind; runs on the gateway reader task
pub type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("WebSocket error: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Protocol error: {0}")]
    Packet(#[from] PacketError),

    #[error("Connection rejected by server: {0}")]
    Rejected(String),

    #[error("Connection closed during handshake")]
    Closed,
}

#[derive(Default)]
struct Handlers {
    orders: Option<Handler<OrderNotification>>,
    menu: Option<Handler<MenuNotification>>,
    tables: Option<Handler<TableNotification>>,
}

struct Inner {
    endpoint: String,
    reconnect_attempts: u32,
    reconnect_delay: Duration,
    connect_timeout: Duration,
    token: Mutex<Option<String>>,
    handlers: Mutex<Handlers>,
    outbound: mpsc::Sender<String>,
    connected: AtomicBool,
    reconnect: Notify,
    shutdown: CancellationToken,
}

/// Real-time notification channel
pub struct SocketGateway {
    inner: Arc<Inner>,
    /// Receiver half, moved into the connection task on first start
    pending_rx: Mutex<Option<mpsc::Receiver<String>>>,
}

enum SessionEnd {
    Shutdown,
    Reconnect,
    Lost,
}

impl SocketGateway {
    /// Create an idle gateway. Nothing connects until
    /// [`reconnect_with_token`](Self::reconnect_with_token).
    pub fn new(config: &ClientConfig) -> Self {
        let (outbound, rx) = mpsc::channel(OUTBOUND_BUFFER);
        Self {
            inner: Arc::new(Inner {
                endpoint: config.socket_endpoint(),
                reconnect_attempts: config.reconnect_attempts.max(1),
                reconnect_delay: config.reconnect_delay,
                connect_timeout: config.connect_timeout,
                token: Mutex::new(None),
                handlers: Mutex::new(Handlers::default()),
                outbound,
                connected: AtomicBool::new(false),
                reconnect: Notify::new(),
                shutdown: CancellationToken::new(),
            }),
            pending_rx: Mutex::new(Some(rx)),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Replace the credential and force a fresh handshake with it.
    ///
    /// Starts the connection task on first use; must be called from within
    /// a Tokio runtime.
    pub fn reconnect_with_token(&self, token: impl Into<String>) {
        if self.inner.shutdown.is_cancelled() {
            tracing::warn!("Socket gateway already shut down, ignoring reconnect");
            return;
        }
        *self.inner.token.lock() = Some(token.into());

        if let Some(rx) = self.pending_rx.lock().take() {
            tracing::info!(endpoint = %self.inner.endpoint, "Starting socket gateway");
            tokio::spawn(run(self.inner.clone(), rx));
        } else {
            self.inner.reconnect.notify_one();
        }
    }

    /// Drop the credential and close the current session.
    ///
    /// The connection task stays alive but idle; the next
    /// [`reconnect_with_token`](Self::reconnect_with_token) resumes it.
    pub fn disconnect(&self) {
        if self.inner.token.lock().take().is_none() {
            return;
        }
        tracing::info!("Disconnecting socket gateway");
        if self.pending_rx.lock().is_none() {
            self.inner.reconnect.notify_one();
        }
    }

    /// Stop the connection task; the gateway cannot be restarted
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }

    // ========== Subscriptions ==========

    /// Register the `order_update` handler, replacing any previous one
    pub fn subscribe_orders(&self, handler: impl Fn(OrderNotification) + Send + Sync + 'static) {
        self.inner.handlers.lock().orders = Some(Arc::new(handler));
    }

    pub fn unsubscribe_orders(&self) {
        self.inner.handlers.lock().orders = None;
    }

    /// Register the `menu_update` handler, replacing any previous one
    pub fn subscribe_menu(&self, handler: impl Fn(MenuNotification) + Send + Sync + 'static) {
        self.inner.handlers.lock().menu = Some(Arc::new(handler));
    }

    pub fn unsubscribe_menu(&self) {
        self.inner.handlers.lock().menu = None;
    }

    /// Register the `table_update` handler, replacing any previous one
    pub fn subscribe_tables(&self, handler: impl Fn(TableNotification) + Send + Sync + 'static) {
        self.inner.handlers.lock().tables = Some(Arc::new(handler));
    }

    pub fn unsubscribe_tables(&self) {
        self.inner.handlers.lock().tables = None;
    }

    pub fn unsubscribe_all(&self) {
        *self.inner.handlers.lock() = Handlers::default();
    }

    // ========== Emits (fire-and-forget) ==========

    pub fn emit_order_update(&self, order_id: i64, status: OrderStatus) {
        let notification = OrderNotification::status_update(order_id, status);
        self.emit(event::UPDATE_ORDER, serde_json::to_value(notification));
    }

    pub fn emit_menu_update(&self, item: MenuNotification) {
        self.emit(event::UPDATE_MENU, serde_json::to_value(item));
    }

    pub fn emit_table_update(&self, table_id: i64, status: TableStatus) {
        let notification = TableNotification {
            table_id,
            status,
            timestamp: Some(chrono::Utc::now()),
        };
        self.emit(event::UPDATE_TABLE, serde_json::to_value(notification));
    }

    fn emit(&self, name: &str, data: serde_json::Result<Value>) {
        let data = match data {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(event = name, "Failed to serialize outbound event: {e}");
                return;
            }
        };
        if !self.is_connected() {
            tracing::warn!(event = name, "Socket not connected, dropping event");
            return;
        }
        let frame = Packet::event(name, data).encode();
        if let Err(e) = self.inner.outbound.try_send(frame) {
            tracing::warn!(event = name, "Dropping outbound event: {e}");
        }
    }
}

impl Drop for SocketGateway {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
    }
}

// ========== Connection task ==========

async fn run(inner: Arc<Inner>, mut outbound_rx: mpsc::Receiver<String>) {
    let mut failures: u32 = 0;

    loop {
        if inner.shutdown.is_cancelled() {
            break;
        }

        let Some(token) = inner.token.lock().clone() else {
            // Logged out: idle until a new credential arrives
            failures = 0;
            tokio::select! {
                _ = inner.shutdown.cancelled() => break,
                _ = inner.reconnect.notified() => continue,
            }
        };
        let attempt = tokio::select! {
            _ = inner.shutdown.cancelled() => break,
            r = tokio::time::timeout(inner.connect_timeout, handshake(&inner.endpoint, token)) => r,
        };

        match attempt {
            Ok(Ok((ws, open))) => {
                failures = 0;
                match run_session(&inner, ws, &open, &mut outbound_rx).await {
                    SessionEnd::Shutdown => break,
                    SessionEnd::Reconnect => continue,
                    SessionEnd::Lost => {}
                }
            }
            Ok(Err(e)) => {
                failures += 1;
                tracing::warn!(attempt = failures, "Socket connection failed: {e}");
            }
            Err(_) => {
                failures += 1;
                tracing::warn!(attempt = failures, "Socket connection timed out");
            }
        }

        if failures >= inner.reconnect_attempts {
            tracing::error!(
                attempts = failures,
                "Socket reconnection attempts exhausted, waiting for new credentials"
            );
            tokio::select! {
                _ = inner.shutdown.cancelled() => break,
                _ = inner.reconnect.notified() => {
                    failures = 0;
                    continue;
                }
            }
        }

        // Wait before reconnecting
        tokio::select! {
            _ = inner.shutdown.cancelled() => break,
            _ = inner.reconnect.notified() => failures = 0,
            _ = tokio::time::sleep(inner.reconnect_delay) => {},
        }
    }

    inner.connected.store(false, Ordering::Release);
    tracing::info!("Socket gateway stopped");
}

/// Engine.IO open + Socket.IO CONNECT
async fn handshake(
    endpoint: &str,
    token: String,
) -> Result<(WsStream, OpenPayload), GatewayError> {
    let (mut ws, _response) = tokio_tungstenite::connect_async(endpoint).await?;

    let open = loop {
        match next_packet(&mut ws).await? {
            Packet::Open(open) => break open,
            other => tracing::debug!(?other, "Ignoring packet before open"),
        }
    };
    tracing::debug!(sid = %open.sid, ping_interval = open.ping_interval, "Engine.IO open");

    let auth = json!({ "token": token });
    ws.send(Message::Text(Packet::connect(Some(auth)).encode().into()))
        .await?;

    loop {
        match next_packet(&mut ws).await? {
            Packet::Connect { .. } => return Ok((ws, open)),
            Packet::ConnectError { data, .. } => {
                let message = data
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| data.to_string());
                return Err(GatewayError::Rejected(message));
            }
            Packet::Ping => {
                ws.send(Message::Text(Packet::Pong.encode().into())).await?;
            }
            other => tracing::debug!(?other, "Ignoring packet during handshake"),
        }
    }
}

async fn next_packet(ws: &mut WsStream) -> Result<Packet, GatewayError> {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return Ok(Packet::decode(text.as_str())?),
            Some(Ok(Message::Close(_))) | None => return Err(GatewayError::Closed),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

/// Run one connected session until it ends
async fn run_session(
    inner: &Inner,
    ws: WsStream,
    open: &OpenPayload,
    outbound_rx: &mut mpsc::Receiver<String>,
) -> SessionEnd {
    let (mut ws_sink, mut ws_stream) = ws.split();

    // Frames queued for a previous session are stale
    while outbound_rx.try_recv().is_ok() {}
    inner.connected.store(true, Ordering::Release);
    tracing::info!("Socket connected");

    // Server pings every pingInterval; allow pingTimeout on top
    let liveness = Duration::from_millis(open.ping_interval + open.ping_timeout);
    let mut deadline = Instant::now() + liveness;

    let end = loop {
        tokio::select! {
            _ = inner.shutdown.cancelled() => {
                tracing::info!("Socket gateway shutting down");
                let _ = ws_sink.send(Message::Text(disconnect_frame().into())).await;
                let _ = ws_sink.close().await;
                break SessionEnd::Shutdown;
            }

            _ = inner.reconnect.notified() => {
                tracing::info!("Credential changed, closing socket session");
                let _ = ws_sink.send(Message::Text(disconnect_frame().into())).await;
                let _ = ws_sink.close().await;
                break SessionEnd::Reconnect;
            }

            Some(frame) = outbound_rx.recv() => {
                if let Err(e) = ws_sink.send(Message::Text(frame.into())).await {
                    tracing::warn!("Socket send failed, disconnecting: {e}");
                    break SessionEnd::Lost;
                }
            }

            _ = tokio::time::sleep_until(deadline) => {
                tracing::warn!("No ping from server, disconnecting");
                break SessionEnd::Lost;
            }

            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => match Packet::decode(text.as_str()) {
                        Ok(Packet::Ping) => {
                            deadline = Instant::now() + liveness;
                            if ws_sink.send(Message::Text(Packet::Pong.encode().into())).await.is_err() {
                                tracing::warn!("Socket pong failed, disconnecting");
                                break SessionEnd::Lost;
                            }
                        }
                        Ok(Packet::Event { name, args, .. }) => {
                            dispatch(inner, &name, Packet::first_arg(&args));
                        }
                        Ok(Packet::Disconnect { .. }) | Ok(Packet::Close) => {
                            tracing::info!("Socket closed by server");
                            break SessionEnd::Lost;
                        }
                        Ok(other) => tracing::debug!(?other, "Ignoring packet"),
                        Err(e) => tracing::warn!("Invalid Socket.IO frame: {e}"),
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed by server");
                        break SessionEnd::Lost;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {e}");
                        break SessionEnd::Lost;
                    }
                    None => {
                        tracing::info!("WebSocket stream ended");
                        break SessionEnd::Lost;
                    }
                }
            }
        }
    };

    inner.connected.store(false, Ordering::Release);
    end
}

fn disconnect_frame() -> String {
    Packet::Disconnect {
        namespace: shared::message::packet::ROOT_NAMESPACE.to_string(),
    }
    .encode()
}

/// Decode and hand one inbound event to its handler.
///
/// The handler is cloned out of the lock first, so it may (un)subscribe.
fn dispatch(inner: &Inner, name: &str, payload: Value) {
    match name {
        event::ORDER_UPDATE => {
            let Some(notification) = OrderNotification::decode(&payload) else {
                return;
            };
            let handler = inner.handlers.lock().orders.clone();
            match handler {
                Some(handler) => handler(notification),
                None => tracing::debug!(event = name, "No handler, event lost"),
            }
        }
        event::MENU_UPDATE => {
            let Some(notification) = MenuNotification::decode(&payload) else {
                return;
            };
            let handler = inner.handlers.lock().menu.clone();
            match handler {
                Some(handler) => handler(notification),
                None => tracing::debug!(event = name, "No handler, event lost"),
            }
        }
        event::TABLE_UPDATE => {
            let Some(notification) = TableNotification::decode(&payload) else {
                return;
            };
            let handler = inner.handlers.lock().tables.clone();
            match handler {
                Some(handler) => handler(notification),
                None => tracing::debug!(event = name, "No handler, event lost"),
            }
        }
        other => tracing::debug!(event = other, "Ignoring unknown event"),
    }
}
