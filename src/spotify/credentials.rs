//! Client-credentials token exchange.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::models::{AccessToken, TokenResponse};
use crate::config::SpotifyCredentials;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("missing Spotify credentials (SPOTIFY_CLIENT_ID/SECRET)")]
    Configuration,

    #[error("token exchange rejected: {0}")]
    UpstreamAuth(String),

    #[error("token exchange failed: {0}")]
    Network(String),
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Fetches a fresh token. Nothing is cached between calls.
    async fn get_token(&self) -> Result<AccessToken, CredentialError>;
}

pub struct ClientCredentialsProvider {
    client: Client,
    token_url: String,
    credentials: Option<SpotifyCredentials>,
}

impl ClientCredentialsProvider {
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `accounts_url` - Base URL of the accounts service (e.g., "https://accounts.spotify.com")
    /// * `credentials` - Client id and secret; `None` makes every call fail with
    ///   [`CredentialError::Configuration`]
    pub fn new(
        client: Client,
        accounts_url: &str,
        credentials: Option<SpotifyCredentials>,
    ) -> Self {
        Self {
            client,
            token_url: format!("{}/api/token", accounts_url.trim_end_matches('/')),
            credentials,
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl CredentialProvider for ClientCredentialsProvider {
    async fn get_token(&self) -> Result<AccessToken, CredentialError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(CredentialError::Configuration)?;

        debug!("Requesting catalog access token from {}", self.token_url);
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CredentialError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CredentialError::UpstreamAuth(format!("status {}", status)));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::UpstreamAuth(format!("unreadable token response: {}", e)))?;

        match body.access_token {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(token, body.expires_in)),
            _ => Err(CredentialError::UpstreamAuth(
                "token response carries no access_token".to_string(),
            )),
        }
    }
}
