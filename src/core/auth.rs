//! Bearer credential providers.
//!
//! Every outbound call asks an [`AuthProvider`] for its headers. The
//! provider is an explicit object handed to the client, never global state.

use crate::api::models::TokenResponse;
use crate::error::AuthError;
use crate::storage::config::Config;
use crate::storage::credentials::Credentials;
use crate::utils::error_helpers::convert_token_error;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;
use tokio::sync::Mutex;

/// Refresh tokens this long before they expire
const TOKEN_REFRESH_BUFFER_SECS: i64 = 300;

/// Lifetime assumed when the token response omits `expires_in`
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

const MAX_TOKEN_LIFETIME_SECS: u64 = 86_400;

/// Headers attached to every API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub content_type: String,
    pub authorization: String,
}

impl AuthHeader {
    pub fn bearer(token: &str) -> Self {
        Self {
            content_type: "application/json".to_string(),
            authorization: format!("Bearer {}", token),
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn auth_header(&self) -> Result<AuthHeader, AuthError>;
}

/// Provider for a token acquired elsewhere
#[derive(Debug, Clone)]
pub struct StaticTokenAuth {
    token: String,
}

impl StaticTokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn auth_header(&self) -> Result<AuthHeader, AuthError> {
        Ok(AuthHeader::bearer(&self.token))
    }
}

#[derive(Debug, Clone)]
struct TokenState {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl TokenState {
    fn new(response: TokenResponse, now: DateTime<Utc>) -> Result<Self, AuthError> {
        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MalformedToken)?;

        let lifetime = response
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
            .min(MAX_TOKEN_LIFETIME_SECS) as i64;
        let expires_at = now
            .checked_add_signed(ChronoDuration::seconds(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Ok(Self {
            access_token,
            expires_at,
        })
    }

    /// True when the token expires within the refresh buffer
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + ChronoDuration::seconds(TOKEN_REFRESH_BUFFER_SECS) >= self.expires_at
    }
}

/// OAuth2 client-credentials flow against the Microsoft identity platform
pub struct ClientCredentialsAuth {
    http: reqwest::Client,
    credentials: Credentials,
    token_url: String,
    scope: String,
    cache_enabled: bool,
    state: Mutex<Option<TokenState>>,
}

impl ClientCredentialsAuth {
    pub fn new(credentials: Credentials, config: &Config) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.get_timeout_secs()))
            .build()
            .map_err(convert_token_error)?;

        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            config.get_authority_url(),
            credentials.tenant_id
        );

        Ok(Self {
            http,
            credentials,
            token_url,
            scope: config.get_scope(),
            cache_enabled: config.token_cache_enabled(),
            state: Mutex::new(None),
        })
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Request a fresh access token
    pub async fn request_token(&self) -> Result<TokenResponse, AuthError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("scope", self.scope.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret()),
        ];

        log::debug!("Requesting access token for client {}", self.credentials.client_id);

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(convert_token_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AuthError::TokenRequest {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|_| AuthError::MalformedToken)
    }

    /// Current access token, reusing the cached one while it is fresh
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        if self.cache_enabled {
            if let Some(cached) = state.as_ref().filter(|s| !s.is_expired(now)) {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = TokenState::new(self.request_token().await?, now)?;
        let token = fresh.access_token.clone();
        if self.cache_enabled {
            *state = Some(fresh);
        }
        Ok(token)
    }
}

#[async_trait]
impl AuthProvider for ClientCredentialsAuth {
    async fn auth_header(&self) -> Result<AuthHeader, AuthError> {
        let token = self.access_token().await?;
        Ok(AuthHeader::bearer(&token))
    }
}
