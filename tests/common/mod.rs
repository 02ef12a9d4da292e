//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{DetectorBehavior, StubDetector, StubSpotify, TestClient, TestServer};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_suggest() {
//!     let detector = StubDetector::spawn(DetectorBehavior::Emotion("happy")).await;
//!     let spotify = StubSpotify::spawn().await;
//!     let server = TestServer::spawn(&detector, &spotify).await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.suggest("happy").await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod server;
mod stubs;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
pub use server::{TestServer, TestServerOptions};
#[allow(unused_imports)]
pub use stubs::{
    default_tracks, spotify_track, DetectorBehavior, ReceivedUpload, StubDetector, StubSpotify,
    StubSpotifyOptions,
};

/// A detector URL nothing listens on
#[allow(dead_code)]
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";
