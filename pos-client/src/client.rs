//! PosClient - application root
//!
//! Owns the HTTP client, the session store and the socket gateway, and
//! keeps the three in step across login, logout and auth failures.

use shared::message::MenuNotification;
use shared::models::{OrderAck, OrderStatus, Role};
use std::sync::Arc;

use crate::cart::Cart;
use crate::message::SocketGateway;
use crate::session::{MemorySessionStore, Route, Session, SessionStore};
use crate::{ClientConfig, ClientError, ClientResult, ErrorDisposition, HttpClient};

pub struct PosClient {
    config: ClientConfig,
    http: HttpClient,
    store: Arc<dyn SessionStore>,
    gateway: SocketGateway,
    session: Option<Session>,
}

impl PosClient {
    /// Client with an in-memory session store
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::with_store(config, Arc::new(MemorySessionStore::new()))
    }

    pub fn with_store(config: ClientConfig, store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let http = config.build_http_client()?;
        let gateway = SocketGateway::new(&config);
        Ok(Self {
            config,
            http,
            store,
            gateway,
            session: None,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn gateway(&self) -> &SocketGateway {
        &self.gateway
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Resume a stored session, if any, and connect the socket with it
    pub async fn restore(&mut self) -> ClientResult<Option<&Session>> {
        let Some(session) = self.store.load().await? else {
            return Ok(None);
        };
        tracing::info!(user_id = session.user_id, role = %session.role, "Session restored");
        self.activate(session);
        Ok(self.session.as_ref())
    }

    /// Log in with mail + password.
    ///
    /// The token alone carries no profile, so the staff list is fetched with
    /// it and the account matching `mail` becomes the session.
    pub async fn login(&mut self, mail: &str, password: &str) -> ClientResult<&Session> {
        if mail.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let token = self.http.login(mail.trim(), password).await?;
        let authed = self.http.clone().with_token(token.access_token.clone());
        let account = authed
            .find_staff_by_mail(mail.trim())
            .await?
            .ok_or_else(|| ClientError::NotFound("Account does not exist".to_string()))?;

        let session = Session::new(token.access_token, &account);
        self.store.save(&session).await?;
        tracing::info!(user_id = session.user_id, role = %session.role, "Logged in");
        self.activate(session);

        self.session
            .as_ref()
            .ok_or_else(|| ClientError::Session("Session not stored".to_string()))
    }

    fn activate(&mut self, session: Session) {
        self.http.set_token(Some(session.token.clone()));
        self.gateway.reconnect_with_token(session.token.clone());
        self.session = Some(session);
    }

    /// Drop the session, every real-time subscription and the socket session
    pub async fn logout(&mut self) -> ClientResult<()> {
        self.gateway.unsubscribe_all();
        self.gateway.disconnect();
        self.http.set_token(None);
        if let Some(session) = self.session.take() {
            tracing::info!(user_id = session.user_id, "Logged out");
        }
        self.store.clear().await
    }

    /// Apply the error policy. `Logout` clears the session before returning.
    pub async fn handle_error(&mut self, err: &ClientError) -> ErrorDisposition {
        let disposition = err.disposition();
        match &disposition {
            ErrorDisposition::Logout => {
                tracing::warn!("Session rejected by server, logging out");
                if let Err(e) = self.logout().await {
                    tracing::error!("Failed to clear session: {e}");
                }
            }
            ErrorDisposition::Banner(message) => tracing::warn!(%message, "Request failed"),
            ErrorDisposition::Inline(_) => {}
        }
        disposition
    }

    /// Guard for a screen restricted to `required`
    pub fn route(&self, required: Role) -> Route {
        crate::session::route_for(self.session.as_ref(), required)
    }

    /// Landing screen for the current session
    pub fn home(&self) -> Route {
        self.session
            .as_ref()
            .map(|s| Route::dashboard_for(s.role))
            .unwrap_or(Route::Login)
    }

    // ========== Workflows ==========

    /// Submit a cart for `table_id` on behalf of the logged-in waiter
    pub async fn place_order(&self, cart: &Cart, table_id: i64) -> ClientResult<OrderAck> {
        let employee_id = self
            .session
            .as_ref()
            .map(|s| s.user_id)
            .ok_or(ClientError::Unauthorized)?;
        let order = cart.to_order(employee_id, table_id)?;
        let ack = self.http.place_order(&order).await?;
        tracing::info!(table_id, items = order.items.len(), "Order placed");
        Ok(ack)
    }

    /// Kitchen status change, then broadcast to the other screens
    pub async fn set_kitchen_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<()> {
        self.http.update_kitchen_order(order_id, status).await?;
        self.gateway.emit_order_update(order_id, status);
        Ok(())
    }

    /// Waiter status change (e.g. served), then broadcast
    pub async fn set_order_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<OrderAck> {
        let ack = self.http.update_order_status(order_id, status).await?;
        self.gateway.emit_order_update(order_id, status);
        Ok(ack)
    }

    /// Flip a menu item's availability, then broadcast
    pub async fn set_menu_availability(&self, food_id: i64, availability: bool) -> ClientResult<()> {
        self.http.set_availability(food_id, availability).await?;
        self.gateway.emit_menu_update(MenuNotification {
            food_id,
            availability,
        });
        Ok(())
    }
}
