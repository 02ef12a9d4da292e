//! Stand-ins for the external services
//!
//! Both stubs are small axum apps bound to random ports. They record what
//! they receive so tests can assert on the outbound traffic.

use super::constants::*;
use axum::{
    extract::{Multipart, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Binds `app` to a random local port and serves it until the sender is dropped.
async fn serve(app: Router) -> (String, tokio::sync::oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub to random port");
    let port = listener
        .local_addr()
        .expect("Failed to get stub address")
        .port();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Stub server failed");
    });

    (format!("http://127.0.0.1:{}", port), shutdown_tx)
}

// ============================================================================
// Emotion Detector
// ============================================================================

/// How the stub detector answers `POST /analyze`.
#[derive(Clone, Debug)]
pub enum DetectorBehavior {
    /// 200 with `{"emotion": <label>, "confidence": 0.93}`
    Emotion(&'static str),
    /// The given status with an error body
    Status(u16),
    /// 200 with this raw body
    Body(&'static str),
    /// Never answers in time
    Hang,
}

/// What the detector saw in the last upload.
#[derive(Clone, Debug)]
pub struct ReceivedUpload {
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

struct DetectorState {
    behavior: DetectorBehavior,
    calls: AtomicUsize,
    last_upload: Mutex<Option<ReceivedUpload>>,
}

pub struct StubDetector {
    pub base_url: String,
    state: Arc<DetectorState>,
    _shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl StubDetector {
    pub async fn spawn(behavior: DetectorBehavior) -> Self {
        let state = Arc::new(DetectorState {
            behavior,
            calls: AtomicUsize::new(0),
            last_upload: Mutex::new(None),
        });

        let app = Router::new()
            .route("/analyze", post(detector_analyze))
            .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
            .with_state(state.clone());

        let (base_url, shutdown_tx) = serve(app).await;
        Self {
            base_url,
            state,
            _shutdown_tx: shutdown_tx,
        }
    }

    /// Number of `POST /analyze` requests received
    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn last_upload(&self) -> Option<ReceivedUpload> {
        self.state.last_upload.lock().unwrap().clone()
    }
}

async fn detector_analyze(
    State(state): State<Arc<DetectorState>>,
    mut multipart: Multipart,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);

    while let Ok(Some(field)) = multipart.next_field().await {
        let upload = ReceivedUpload {
            field: field.name().unwrap_or("").to_string(),
            filename: field.file_name().map(|s| s.to_string()),
            content_type: field.content_type().map(|s| s.to_string()),
            bytes: field.bytes().await.map(|b| b.to_vec()).unwrap_or_default(),
        };
        *state.last_upload.lock().unwrap() = Some(upload);
    }

    match &state.behavior {
        DetectorBehavior::Emotion(emotion) => {
            Json(json!({"emotion": emotion, "confidence": 0.93})).into_response()
        }
        DetectorBehavior::Status(code) => (
            StatusCode::from_u16(*code).unwrap(),
            Json(json!({"error": "detector exploded"})),
        )
            .into_response(),
        DetectorBehavior::Body(body) => {
            ([(header::CONTENT_TYPE, "text/plain")], *body).into_response()
        }
        DetectorBehavior::Hang => {
            tokio::time::sleep(Duration::from_secs(DETECTOR_TIMEOUT_SECS * 30)).await;
            Json(json!({"emotion": "neutral"})).into_response()
        }
    }
}

// ============================================================================
// Spotify Accounts + Web API
// ============================================================================

/// A catalog item in the Web API's shape.
pub fn spotify_track(id: &str, name: &str, artist: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": [{"name": artist}],
        "external_urls": {"spotify": format!("https://open.spotify.com/track/{}", id)},
        "preview_url": format!("https://p.scdn.co/mp3-preview/{}", id),
    })
}

/// An unusable item followed by two good ones.
pub fn default_tracks() -> Value {
    json!({
        "tracks": [
            {"id": "nameless", "name": "", "artists": []},
            spotify_track(TRACK_1_ID, TRACK_1_NAME, TRACK_1_ARTIST),
            spotify_track("track-2", TRACK_2_NAME, "Someone Else"),
        ]
    })
}

pub struct StubSpotifyOptions {
    pub accept_token: bool,
    pub recommendations: Value,
}

impl Default for StubSpotifyOptions {
    fn default() -> Self {
        Self {
            accept_token: true,
            recommendations: default_tracks(),
        }
    }
}

struct SpotifyState {
    options: StubSpotifyOptions,
    token_calls: AtomicUsize,
    recommendation_calls: AtomicUsize,
    last_query: Mutex<Option<HashMap<String, String>>>,
}

pub struct StubSpotify {
    /// Stands in for `https://accounts.spotify.com`
    pub accounts_url: String,
    /// Stands in for `https://api.spotify.com/v1`
    pub api_url: String,
    state: Arc<SpotifyState>,
    _shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl StubSpotify {
    pub async fn spawn() -> Self {
        Self::spawn_with(StubSpotifyOptions::default()).await
    }

    pub async fn spawn_with(options: StubSpotifyOptions) -> Self {
        let state = Arc::new(SpotifyState {
            options,
            token_calls: AtomicUsize::new(0),
            recommendation_calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        });

        let app = Router::new()
            .route("/api/token", post(spotify_token))
            .route("/v1/recommendations", get(spotify_recommendations))
            .with_state(state.clone());

        let (base_url, shutdown_tx) = serve(app).await;
        Self {
            accounts_url: base_url.clone(),
            api_url: format!("{}/v1", base_url),
            state,
            _shutdown_tx: shutdown_tx,
        }
    }

    pub fn token_calls(&self) -> usize {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    pub fn recommendation_calls(&self) -> usize {
        self.state.recommendation_calls.load(Ordering::SeqCst)
    }

    /// Query string of the last recommendations request
    pub fn last_query(&self) -> Option<HashMap<String, String>> {
        self.state.last_query.lock().unwrap().clone()
    }
}

async fn spotify_token(
    State(state): State<Arc<SpotifyState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_calls.fetch_add(1, Ordering::SeqCst);

    let has_basic_auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    let is_client_credentials =
        form.get("grant_type").map(String::as_str) == Some("client_credentials");

    if !state.options.accept_token || !has_basic_auth || !is_client_credentials {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_client"})),
        )
            .into_response();
    }

    Json(json!({
        "access_token": TEST_ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3600,
    }))
    .into_response()
}

async fn spotify_recommendations(
    State(state): State<Arc<SpotifyState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.recommendation_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_query.lock().unwrap() = Some(query);

    let expected = format!("Bearer {}", TEST_ACCESS_TOKEN);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(state.options.recommendations.clone()).into_response()
}
