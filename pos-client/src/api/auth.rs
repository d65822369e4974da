//! User service: authentication

use crate::{ClientResult, HttpClient};
use shared::client::{LoginRequest, TokenResponse};

impl HttpClient {
    /// Exchange credentials for a bearer token.
    ///
    /// Does not store the token; see [`crate::PosClient::login`]. Rejected
    /// credentials come back as a `Server` error carrying the detail.
    pub async fn login(&self, mail: &str, password: &str) -> ClientResult<TokenResponse> {
        let request = LoginRequest {
            mail: mail.to_string(),
            password: password.to_string(),
        };
        self.post_credentials("/api/users/login", &request).await
    }
}
