//! Spotify catalog access: token exchange, recommendations, track selection.

mod credentials;
mod models;
mod recommendations;
mod recommender;

pub use credentials::{ClientCredentialsProvider, CredentialError, CredentialProvider};
pub use models::{AccessToken, Track, GENERIC_CATALOG_URL, SAMPLE_ARTIST, UNKNOWN_ARTIST};
pub use recommendations::{
    RecommendationClient, RecommendationError, SpotifyRecommendationClient, DEFAULT_LIMIT,
};
pub use recommender::TrackRecommender;
