mod cli_style;

use anyhow::{Context, Result};
use clap::Parser;
use cli_style::get_styles;
use moodtune_server::config::{AppConfig, ServiceArgs, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT};
use moodtune_server::detector::DetectorClient;
use moodtune_server::emotion::RandomEmotionPicker;
use moodtune_server::spotify::TrackRecommender;
use moodtune_server::{run_server, RequestsLoggingLevel};
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Serves emotion scans and track suggestions over HTTP.
#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Largest accepted request body, in bytes.
    #[clap(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl CliArgs {
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut cli_config = self.service.to_cli_config();
        cli_config.port = self.port;
        cli_config.logging_level = self.logging_level.clone();
        cli_config.frontend_dir_path = self.frontend_dir_path.clone();
        cli_config.max_upload_bytes = self.max_upload_bytes;

        AppConfig::resolve(&cli_config, self.service.load_file_config()?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let config = cli_args.resolve_config()?;

    if !config.has_spotify_credentials() {
        warn!("SPOTIFY_CLIENT_ID/SPOTIFY_CLIENT_SECRET not set, catalog requests will fail");
    }

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload directory {:?}", config.upload_dir))?;
    info!("Staging uploads in {:?}", config.upload_dir);

    let detector = DetectorClient::from_config(&config)?;
    if detector.health_check().await {
        info!("Emotion detector reachable at {}", detector.base_url());
    } else {
        warn!(
            "Emotion detector at {} is not reachable, scans will use random emotions until it is",
            detector.base_url()
        );
    }

    let recommender = TrackRecommender::from_config(&config)?;
    info!(
        "Catalog at {} (limit {})",
        config.spotify_api_url,
        recommender.limit()
    );

    run_server(
        config.server_config(),
        Arc::new(detector),
        Arc::new(recommender),
        Arc::new(RandomEmotionPicker),
    )
    .await
}
