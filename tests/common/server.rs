//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own upload directory, wired to
//! stub detector and catalog services.

use super::constants::*;
use super::stubs::{StubDetector, StubSpotify};
use moodtune_server::config::{AppConfig, CliConfig};
use moodtune_server::detector::DetectorClient;
use moodtune_server::emotion::RandomEmotionPicker;
use moodtune_server::server::{make_app, RequestsLoggingLevel};
use moodtune_server::spotify::TrackRecommender;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Where the server under test sends its outbound traffic.
pub struct TestServerOptions {
    pub detector_url: String,
    pub spotify_accounts_url: String,
    pub spotify_api_url: String,
    /// Whether client id/secret are configured at all
    pub with_credentials: bool,
    pub max_upload_bytes: Option<usize>,
}

impl TestServerOptions {
    pub fn new(detector: &StubDetector, spotify: &StubSpotify) -> Self {
        Self {
            detector_url: detector.base_url.clone(),
            spotify_accounts_url: spotify.accounts_url.clone(),
            spotify_api_url: spotify.api_url.clone(),
            with_credentials: true,
            max_upload_bytes: None,
        }
    }
}

/// Test server instance
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    upload_dir: PathBuf,

    // Private fields - keep resources alive until drop
    _temp_upload_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server wired to the given stubs on a random port
    pub async fn spawn(detector: &StubDetector, spotify: &StubSpotify) -> Self {
        Self::spawn_with(TestServerOptions::new(detector, spotify)).await
    }

    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if the config doesn't resolve, the port can't be bound or the
    /// server doesn't become ready within timeout.
    pub async fn spawn_with(options: TestServerOptions) -> Self {
        let temp_upload_dir = TempDir::new().expect("Failed to create upload dir");
        let upload_dir = temp_upload_dir.path().join("uploads");

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let (client_id, client_secret) = if options.with_credentials {
            (
                Some(TEST_CLIENT_ID.to_string()),
                Some(TEST_CLIENT_SECRET.to_string()),
            )
        } else {
            (None, None)
        };

        let defaults = CliConfig::default();
        let cli_config = CliConfig {
            port,
            detector_url: options.detector_url,
            detector_timeout_sec: DETECTOR_TIMEOUT_SECS,
            spotify_client_id: client_id,
            spotify_client_secret: client_secret,
            spotify_accounts_url: options.spotify_accounts_url,
            spotify_api_url: options.spotify_api_url,
            upload_dir: Some(upload_dir.clone()),
            max_upload_bytes: options
                .max_upload_bytes
                .unwrap_or(defaults.max_upload_bytes),
            logging_level: RequestsLoggingLevel::None,
            ..defaults
        };
        let config = AppConfig::resolve(&cli_config, None).expect("Failed to resolve config");

        let detector = DetectorClient::from_config(&config).expect("Failed to build detector");
        let recommender =
            TrackRecommender::from_config(&config).expect("Failed to build recommender");

        let app = make_app(
            config.server_config(),
            Arc::new(detector),
            Arc::new(recommender),
            Arc::new(RandomEmotionPicker),
        );

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            upload_dir,
            _temp_upload_dir: temp_upload_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Directory the server stages uploads in
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Files currently staged; empty whenever no request is in flight
    pub fn staged_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(&self.upload_dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Waits for the server to become ready by polling the / endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    // Server is ready
                    return;
                }
                _ => {
                    // Server not ready yet, wait and retry
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
