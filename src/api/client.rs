//! Auth client for the launcher backend.
//!
//! The session validator talks to the backend through the `AuthClient`
//! trait so tests can substitute a mock; `HttpAuthClient` is the real
//! implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Token check endpoint, relative to the backend base URL
const CHECK_TOKEN_PATH: &str = "/api/v1/auth/checkToken";

/// HTTP request timeout in seconds.
/// The validator treats a slow backend the same as an unreachable one, so
/// there is no point waiting longer than this.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Outcome of a remote token check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStatus {
    pub is_auth: bool,
    pub username: Option<String>,
}

/// Remote token verification seam.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Ask the auth service whether the token still identifies an
    /// authenticated user.
    async fn check_token(&self, token: &str) -> Result<AuthStatus, ApiError>;
}

#[derive(Debug, Deserialize)]
struct CheckTokenResponse {
    user: Option<TokenUser>,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    #[serde(rename = "isAuth")]
    is_auth: bool,
    name: Option<String>,
}

/// Auth client for the launcher backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpAuthClient {
    client: Client,
    base_url: String,
}

impl HttpAuthClient {
    /// Create a client for the given backend base URL (no trailing slash).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check if a response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn check_token(&self, token: &str) -> Result<AuthStatus, ApiError> {
        let url = format!("{}{}", self.base_url, CHECK_TOKEN_PATH);

        let response = self.client.post(&url).bearer_auth(token).send().await?;
        let response = Self::check_response(response).await?;

        let payload: CheckTokenResponse = response.json().await?;
        let status = match payload.user {
            Some(user) => AuthStatus {
                is_auth: user.is_auth,
                username: user.name,
            },
            None => AuthStatus {
                is_auth: false,
                username: None,
            },
        };

        debug!(is_auth = status.is_auth, "token check completed");
        Ok(status)
    }
}

// ============================================================================
// Tests
// ============================================================================
