//! Auth API DTOs
//!
//! Request/response types of the user service login endpoint.

use serde::{Deserialize, Serialize};

/// Login request (`POST /api/users/login`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub mail: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// FastAPI error body: `{"detail": ...}`
///
/// The API gateway forwards upstream error bodies wholesale, so `detail`
/// may itself be an object with a `detail` key, or a validation error list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Human-readable message: innermost string `detail`, else the JSON text
    pub fn message(&self) -> String {
        let mut current = &self.detail;
        while let Some(inner) = current.get("detail") {
            current = inner;
        }
        match current {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_unwraps_gateway_nesting() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": {"detail": "Table not found"}}"#).unwrap();
        assert_eq!(body.message(), "Table not found");
    }

    #[test]
    fn test_error_detail_list_is_rendered_as_json() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#)
                .unwrap();
        assert!(body.message().contains("field required"));
    }
}
