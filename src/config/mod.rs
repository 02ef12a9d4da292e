mod args;
mod file_config;

pub use args::ServiceArgs;
pub use file_config::{FileConfig, SpotifyConfig};

use crate::server::{RequestsLoggingLevel, ServerConfig};
use crate::spotify::DEFAULT_LIMIT;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DETECTOR_URL: &str = "http://127.0.0.1:6000";
pub const DEFAULT_DETECTOR_TIMEOUT_SEC: u64 = 20;
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// The catalog refuses larger recommendation limits.
const MAX_RECOMMENDATION_LIMIT: u32 = 100;
const UPLOAD_DIR_NAME: &str = "moodtune-uploads";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub detector_url: String,
    pub detector_timeout_sec: u64,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_accounts_url: String,
    pub spotify_api_url: String,
    pub recommendation_limit: u32,
    pub upload_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            detector_url: DEFAULT_DETECTOR_URL.to_string(),
            detector_timeout_sec: DEFAULT_DETECTOR_TIMEOUT_SEC,
            spotify_client_id: None,
            spotify_client_secret: None,
            spotify_accounts_url: DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string(),
            spotify_api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            recommendation_limit: DEFAULT_LIMIT,
            upload_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            logging_level: RequestsLoggingLevel::default(),
            frontend_dir_path: None,
        }
    }
}

/// Client identity for the catalog's client-credentials flow.
#[derive(Clone, PartialEq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Settings resolved once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub detector_url: String,
    pub detector_timeout_sec: u64,
    /// `None` when either half is missing; every suggestion then fails
    /// with a configuration error.
    pub spotify_credentials: Option<SpotifyCredentials>,
    pub spotify_accounts_url: String,
    pub spotify_api_url: String,
    pub recommendation_limit: u32,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let spotify = file.spotify.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let detector_url = validate_url(
            "detector_url",
            file.detector_url.as_deref().unwrap_or(&cli.detector_url),
        )?;

        let detector_timeout_sec = file
            .detector_timeout_sec
            .unwrap_or(cli.detector_timeout_sec);
        if detector_timeout_sec == 0 {
            bail!("detector_timeout_sec must be greater than zero");
        }

        let spotify_accounts_url = validate_url(
            "spotify accounts_url",
            spotify
                .accounts_url
                .as_deref()
                .unwrap_or(&cli.spotify_accounts_url),
        )?;
        let spotify_api_url = validate_url(
            "spotify api_url",
            spotify.api_url.as_deref().unwrap_or(&cli.spotify_api_url),
        )?;

        let client_id = non_empty(spotify.client_id.or_else(|| cli.spotify_client_id.clone()));
        let client_secret = non_empty(
            spotify
                .client_secret
                .or_else(|| cli.spotify_client_secret.clone()),
        );
        let spotify_credentials = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(SpotifyCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let recommendation_limit = file
            .recommendation_limit
            .unwrap_or(cli.recommendation_limit);
        if !(1..=MAX_RECOMMENDATION_LIMIT).contains(&recommendation_limit) {
            bail!(
                "recommendation_limit must be between 1 and {}, got {}",
                MAX_RECOMMENDATION_LIMIT,
                recommendation_limit
            );
        }

        let upload_dir = file
            .upload_dir
            .map(PathBuf::from)
            .or_else(|| cli.upload_dir.clone())
            .unwrap_or_else(|| std::env::temp_dir().join(UPLOAD_DIR_NAME));

        let max_upload_bytes = file.max_upload_bytes.unwrap_or(cli.max_upload_bytes);
        if max_upload_bytes == 0 {
            bail!("max_upload_bytes must be greater than zero");
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        Ok(Self {
            port,
            detector_url,
            detector_timeout_sec,
            spotify_credentials,
            spotify_accounts_url,
            spotify_api_url,
            recommendation_limit,
            upload_dir,
            max_upload_bytes,
            logging_level,
            frontend_dir_path,
        })
    }

    pub fn detector_timeout(&self) -> Duration {
        Duration::from_secs(self.detector_timeout_sec)
    }

    pub fn has_spotify_credentials(&self) -> bool {
        self.spotify_credentials.is_some()
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            frontend_dir_path: self.frontend_dir_path.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Checks that `value` is an absolute http(s) URL and strips trailing slashes.
fn validate_url(name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed)
        .with_context(|| format!("Invalid {}: {:?}", name, value))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{} must be an http(s) URL, got {:?}", name, value);
    }
    Ok(trimmed.to_string())
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
