// Token acquisition for the storage provider.
//
// The core never talks to an OAuth server itself. Whoever builds the session
// hands it something that can produce a bearer token, and the session asks
// for one before each round of Drive calls.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid service account credentials: {0}")]
    InvalidCredentials(String),

    #[error("Token exchange failed ({status}): {body}")]
    TokenExchange { status: u16, body: String },

    #[error("Token request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns a bearer token with read access to Drive.
    async fn request_token(&self) -> Result<String, AuthError>;
}

#[async_trait]
impl AuthProvider for Box<dyn AuthProvider> {
    async fn request_token(&self) -> Result<String, AuthError> {
        (**self).request_token().await
    }
}
