use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::{
    CliConfig, FileConfig, DEFAULT_DETECTOR_TIMEOUT_SEC, DEFAULT_DETECTOR_URL,
    DEFAULT_SPOTIFY_ACCOUNTS_URL, DEFAULT_SPOTIFY_API_URL,
};
use crate::spotify::DEFAULT_LIMIT;

/// Arguments shared by every binary that talks to the detector and the catalog.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Path to a TOML config file. Values in the file override the command line.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the emotion detection service.
    #[clap(long, env = "PY_DETECT_URL", default_value = DEFAULT_DETECTOR_URL)]
    pub detector_url: String,

    /// Timeout in seconds for a single detector request.
    #[clap(long, default_value_t = DEFAULT_DETECTOR_TIMEOUT_SEC)]
    pub detector_timeout_sec: u64,

    /// Spotify application client id.
    #[clap(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub spotify_client_id: Option<String>,

    /// Spotify application client secret.
    #[clap(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,

    /// Base URL of the Spotify accounts service.
    #[clap(long, default_value = DEFAULT_SPOTIFY_ACCOUNTS_URL)]
    pub spotify_accounts_url: String,

    /// Base URL of the Spotify Web API.
    #[clap(long, default_value = DEFAULT_SPOTIFY_API_URL)]
    pub spotify_api_url: String,

    /// Number of candidates requested from the catalog per suggestion.
    #[clap(long, default_value_t = DEFAULT_LIMIT)]
    pub recommendation_limit: u32,

    /// Directory for transient copies of uploaded images.
    #[clap(long)]
    pub upload_dir: Option<PathBuf>,
}

impl ServiceArgs {
    /// Service settings on top of the defaults. Server-only settings are left
    /// for the caller to fill in.
    pub fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            detector_url: self.detector_url.clone(),
            detector_timeout_sec: self.detector_timeout_sec,
            spotify_client_id: self.spotify_client_id.clone(),
            spotify_client_secret: self.spotify_client_secret.clone(),
            spotify_accounts_url: self.spotify_accounts_url.clone(),
            spotify_api_url: self.spotify_api_url.clone(),
            recommendation_limit: self.recommendation_limit,
            upload_dir: self.upload_dir.clone(),
            ..Default::default()
        }
    }

    pub fn load_file_config(&self) -> Result<Option<FileConfig>> {
        self.config.as_deref().map(FileConfig::load).transpose()
    }
}
