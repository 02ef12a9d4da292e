use serde::{Deserialize, Serialize};
use std::fmt;

use crate::emotion::EmotionLabel;

/// Placeholder artist for tracks the catalog returns without one.
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// Artist of the sample track used when the catalog can't be queried.
pub const SAMPLE_ARTIST: &str = "Sample Artist";

/// Generic catalog link for tracks without one of their own.
pub const GENERIC_CATALOG_URL: &str = "https://open.spotify.com/";

/// A single suggested track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    #[serde(rename = "spotify_url")]
    pub catalog_url: String,
    pub preview_url: Option<String>,
}

impl Track {
    /// Placeholder suggestion for an emotion.
    pub fn sample(emotion: &EmotionLabel) -> Self {
        Self {
            name: format!("{} song (sample)", emotion),
            artist: SAMPLE_ARTIST.to_string(),
            catalog_url: GENERIC_CATALOG_URL.to_string(),
            preview_url: None,
        }
    }
}

/// Bearer token for the catalog API.
///
/// `expires_in` is what the provider advertised; it isn't used for caching.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_in: Option<u64>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_in: Option<u64>) -> Self {
        Self {
            value: value.into(),
            expires_in,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

// Wire types. Every field is optional: the catalog is free to omit any of them.

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RecommendationsResponse {
    #[serde(default)]
    pub tracks: Option<Vec<SpotifyTrack>>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SpotifyTrack {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Option<Vec<SpotifyArtist>>,
    pub external_urls: Option<ExternalUrls>,
    pub preview_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SpotifyArtist {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ExternalUrls {
    pub spotify: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl SpotifyTrack {
    /// Converts into a [`Track`]; `None` when the item has no name.
    pub fn into_track(self) -> Option<Track> {
        let name = non_empty(self.name)?;

        let artist = self
            .artists
            .and_then(|artists| artists.into_iter().next())
            .and_then(|artist| non_empty(artist.name))
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

        let catalog_url = non_empty(self.external_urls.and_then(|urls| urls.spotify))
            .or_else(|| non_empty(self.id).map(|id| format!("{}track/{}", GENERIC_CATALOG_URL, id)))
            .unwrap_or_else(|| GENERIC_CATALOG_URL.to_string());

        Some(Track {
            name,
            artist,
            catalog_url,
            preview_url: non_empty(self.preview_url),
        })
    }
}
