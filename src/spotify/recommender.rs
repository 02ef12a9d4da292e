use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::credentials::{ClientCredentialsProvider, CredentialProvider};
use super::models::Track;
use super::recommendations::{RecommendationClient, RecommendationError, SpotifyRecommendationClient};
use crate::config::AppConfig;
use crate::emotion::{map_emotion, EmotionLabel};

/// Timeout for each call to the accounts and catalog APIs.
const CATALOG_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Turns an emotion into one catalog track: map the emotion, fetch a token,
/// query the catalog.
pub struct TrackRecommender {
    credentials: Arc<dyn CredentialProvider>,
    catalog: Arc<dyn RecommendationClient>,
    limit: u32,
}

impl TrackRecommender {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        catalog: Arc<dyn RecommendationClient>,
        limit: u32,
    ) -> Self {
        Self {
            credentials,
            catalog,
            limit,
        }
    }

    /// Builds the Spotify-backed recommender. Both APIs share one connection pool.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(CATALOG_REQUEST_TIMEOUT)
            .build()
            .context("Failed to create catalog HTTP client")?;

        let credentials = ClientCredentialsProvider::new(
            client.clone(),
            &config.spotify_accounts_url,
            config.spotify_credentials.clone(),
        );
        let catalog = SpotifyRecommendationClient::new(client, &config.spotify_api_url);

        Ok(Self::new(
            Arc::new(credentials),
            Arc::new(catalog),
            config.recommendation_limit,
        ))
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub async fn recommend_for(&self, emotion: &EmotionLabel) -> Result<Track, RecommendationError> {
        let query = map_emotion(emotion);
        let token = self.credentials.get_token().await?;
        self.catalog.recommend(&query, &token, self.limit).await
    }
}
