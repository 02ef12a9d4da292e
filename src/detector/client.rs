//! HTTP client for the external emotion detection service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::scratch::{ScratchDir, StagedImage};
use crate::capture::CapturedImage;
use crate::config::AppConfig;
use crate::emotion::EmotionLabel;

/// Multipart field carrying the image, both inbound and towards the detector.
pub const IMAGE_FIELD: &str = "image";

/// Upper bound for the startup reachability probe.
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Every way the detector can fail. All of them mean analysis is unavailable.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("detector did not answer within {0:?}")]
    Timeout(Duration),

    #[error("detector unreachable: {0}")]
    Network(String),

    #[error("detector responded with status {0}")]
    Status(u16),

    #[error("detector returned a malformed response: {0}")]
    Malformed(String),

    #[error("image rejected before forwarding: {0}")]
    InvalidImage(String),

    #[error("failed to stage image: {0}")]
    Staging(#[from] std::io::Error),
}

#[async_trait]
pub trait AnalyzeGateway: Send + Sync {
    /// Sends the image to the detector and returns its JSON body untouched.
    async fn forward(&self, image: CapturedImage) -> Result<Value, AnalysisError>;

    /// Sends the image and extracts the detected emotion.
    async fn analyze(&self, image: CapturedImage) -> Result<EmotionLabel, AnalysisError> {
        let body = self.forward(image).await?;
        emotion_from_response(&body)
    }
}

/// Reads `{"emotion": "..."}` out of a detector response.
pub fn emotion_from_response(body: &Value) -> Result<EmotionLabel, AnalysisError> {
    match body.get("emotion") {
        Some(Value::String(raw)) => EmotionLabel::parse(raw)
            .ok_or_else(|| AnalysisError::Malformed("empty emotion label".to_string())),
        None | Some(Value::Null) => Err(AnalysisError::Malformed(
            "response carries no emotion".to_string(),
        )),
        Some(other) => Err(AnalysisError::Malformed(format!(
            "unexpected emotion value: {}",
            other
        ))),
    }
}

pub struct DetectorClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    scratch: ScratchDir,
}

impl DetectorClient {
    /// Create a new detector client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the detection service (e.g., "http://127.0.0.1:6000")
    /// * `timeout` - Upper bound for a single analysis request
    /// * `scratch` - Where uploads are staged before being forwarded
    pub fn new(base_url: impl Into<String>, timeout: Duration, scratch: ScratchDir) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create detector HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            timeout,
            scratch,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.detector_url.clone(),
            config.detector_timeout(),
            ScratchDir::new(&config.upload_dir),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Check if the detection service is reachable.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        let request = self.client.get(&url).timeout(self.health_check_timeout());
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn health_check_timeout(&self) -> Duration {
        self.timeout.min(HEALTH_CHECK_TIMEOUT)
    }

    async fn post_staged(
        &self,
        staged: &StagedImage,
        image: &CapturedImage,
    ) -> Result<Value, AnalysisError> {
        let bytes = staged.read().await?;
        let part = Part::bytes(bytes)
            .file_name(image.filename())
            .mime_str(image.media_type())
            .map_err(|e| AnalysisError::InvalidImage(e.to_string()))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let url = format!("{}/analyze", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                AnalysisError::Timeout(self.timeout)
            } else {
                AnalysisError::Malformed(e.to_string())
            }
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout(self.timeout)
        } else {
            AnalysisError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl AnalyzeGateway for DetectorClient {
    async fn forward(&self, image: CapturedImage) -> Result<Value, AnalysisError> {
        let staged = self.scratch.stage(&image).await?;
        debug!(
            "Forwarding {} ({} bytes) to detector via {:?}",
            image.filename(),
            image.len(),
            staged.path()
        );
        // `staged` is dropped on return, whatever the outcome.
        self.post_staged(&staged, &image).await
    }
}
