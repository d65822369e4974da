//! Client configuration

use std::time::Duration;

/// Default API gateway address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Socket.IO reconnection attempts before the gateway gives up
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 10;
/// Fixed delay between reconnection attempts
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 1000;
/// Connect + handshake timeout
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Client configuration for connecting to the POS backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API gateway base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Socket.IO server URL; `None` means same host as `base_url`
    pub socket_url: Option<String>,

    /// REST request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,

    /// Socket reconnection attempts per outage
    pub reconnect_attempts: u32,

    /// Delay between socket reconnection attempts
    pub reconnect_delay: Duration,

    /// Socket connect / handshake timeout
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            socket_url: None,
            timeout: None,
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        }
    }

    /// Build from `POS_*` environment variables, falling back to defaults.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Self {
        let mut config =
            Self::new(std::env::var("POS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()));

        if let Ok(url) = std::env::var("POS_SOCKET_URL") {
            config.socket_url = Some(url);
        }
        if let Some(secs) = env_parse::<u64>("POS_HTTP_TIMEOUT_SECS") {
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(attempts) = env_parse::<u32>("POS_RECONNECT_ATTEMPTS") {
            config.reconnect_attempts = attempts;
        }
        if let Some(ms) = env_parse::<u64>("POS_RECONNECT_DELAY_MS") {
            config.reconnect_delay = Duration::from_millis(ms);
        }
        config
    }

    /// Set the Socket.IO server URL
    pub fn with_socket_url(mut self, url: impl Into<String>) -> Self {
        self.socket_url = Some(url.into());
        self
    }

    /// Set the REST request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the socket reconnection policy
    pub fn with_reconnect(mut self, attempts: u32, delay: Duration) -> Self {
        self.reconnect_attempts = attempts;
        self.reconnect_delay = delay;
        self
    }

    /// Set the socket connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// WebSocket endpoint of the Socket.IO server
    pub fn socket_endpoint(&self) -> String {
        let base = self
            .socket_url
            .as_deref()
            .unwrap_or(&self.base_url)
            .trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };
        format!(
            "{ws_base}/socket.io/?EIO={}&transport=websocket",
            shared::message::packet::ENGINE_IO_VERSION
        )
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::HttpClient> {
        crate::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring invalid environment value");
            None
        }
    }
}
