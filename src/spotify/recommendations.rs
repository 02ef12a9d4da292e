//! Catalog recommendation query.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::credentials::CredentialError;
use super::models::{AccessToken, RecommendationsResponse, Track};
use crate::emotion::RecommendationQuery;

/// How many candidates are requested from the catalog by default.
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("catalog returned no recommendations")]
    NoRecommendations,

    #[error("catalog responded with status {0}")]
    Upstream(u16),

    #[error("catalog returned a malformed response: {0}")]
    Malformed(String),

    #[error("catalog request failed: {0}")]
    Network(String),
}

#[async_trait]
pub trait RecommendationClient: Send + Sync {
    async fn recommend(
        &self,
        query: &RecommendationQuery,
        token: &AccessToken,
        limit: u32,
    ) -> Result<Track, RecommendationError>;
}

pub struct SpotifyRecommendationClient {
    client: Client,
    recommendations_url: String,
}

impl SpotifyRecommendationClient {
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `api_url` - Base URL of the catalog API (e.g., "https://api.spotify.com/v1")
    pub fn new(client: Client, api_url: &str) -> Self {
        Self {
            client,
            recommendations_url: format!("{}/recommendations", api_url.trim_end_matches('/')),
        }
    }

    pub fn recommendations_url(&self) -> &str {
        &self.recommendations_url
    }
}

/// Query string for a recommendation request. Genres are omitted when there are none.
fn query_params(query: &RecommendationQuery, limit: u32) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(3);
    if !query.genres.is_empty() {
        params.push(("seed_genres", query.seed_genres()));
    }
    params.push(("target_valence", query.target_valence.to_string()));
    params.push(("limit", limit.to_string()));
    params
}

/// Picks the first usable item, in catalog order.
fn select_track(response: RecommendationsResponse) -> Result<Track, RecommendationError> {
    response
        .tracks
        .unwrap_or_default()
        .into_iter()
        .find_map(|item| item.into_track())
        .ok_or(RecommendationError::NoRecommendations)
}

#[async_trait]
impl RecommendationClient for SpotifyRecommendationClient {
    async fn recommend(
        &self,
        query: &RecommendationQuery,
        token: &AccessToken,
        limit: u32,
    ) -> Result<Track, RecommendationError> {
        let params = query_params(query, limit);
        debug!("Querying catalog recommendations with {:?}", params);

        let response = self
            .client
            .get(&self.recommendations_url)
            .bearer_auth(token.value())
            .query(&params)
            .send()
            .await
            .map_err(|e| RecommendationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecommendationError::Upstream(status.as_u16()));
        }

        let body: RecommendationsResponse = response
            .json()
            .await
            .map_err(|e| RecommendationError::Malformed(e.to_string()))?;

        select_track(body)
    }
}
