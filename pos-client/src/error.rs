//! Client error types

use thiserror::Error;

/// Banner text shown when the server cannot be reached at all
pub const NETWORK_BANNER: &str = "Cannot connect to server. Please check your connection.";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response from the server (connect refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication required (401)
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (404) or missing account
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client-side validation failure; no request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other 4xx/5xx, carrying the server's `detail`
    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Session persistence failed
    #[error("Session store error: {0}")]
    Session(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// How the view layer reacts to an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// Clear the session and return to the login screen
    Logout,
    /// Show next to the offending field; nothing was sent
    Inline(String),
    /// Page-level banner
    Banner(String),
}

impl ClientError {
    pub fn disposition(&self) -> ErrorDisposition {
        match self {
            Self::Unauthorized => ErrorDisposition::Logout,
            Self::Validation(msg) => ErrorDisposition::Inline(msg.clone()),
            Self::Network(_) => ErrorDisposition::Banner(NETWORK_BANNER.to_string()),
            Self::Server { detail, .. } => ErrorDisposition::Banner(detail.clone()),
            Self::Forbidden(detail) | Self::NotFound(detail) => {
                ErrorDisposition::Banner(detail.clone())
            }
            other => ErrorDisposition::Banner(other.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
