//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint. When API routes or
//! request formats change, update only this file.

use super::constants::*;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn image_form(field: &str, bytes: &[u8], filename: &str, mime: &str) -> Form {
        let part = Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime)
            .expect("Invalid mime type");
        Form::new().part(field.to_string(), part)
    }

    // ========================================================================
    // Home
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Analyze
    // ========================================================================

    /// POST /api/analyze with a JPEG in the `image` field
    pub async fn analyze(&self, bytes: &[u8]) -> Response {
        self.analyze_form(Self::image_form("image", bytes, TEST_IMAGE_NAME, "image/jpeg"))
            .await
    }

    /// POST /api/analyze with a hand-built form
    pub async fn analyze_form(&self, form: Form) -> Response {
        self.client
            .post(format!("{}/api/analyze", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Analyze request failed")
    }

    /// POST /api/analyze with a single upload field named `field`
    pub async fn analyze_field(&self, field: &str, bytes: &[u8], filename: &str, mime: &str) -> Response {
        self.analyze_form(Self::image_form(field, bytes, filename, mime))
            .await
    }

    // ========================================================================
    // Suggest
    // ========================================================================

    /// POST /api/suggest with the given JSON body
    pub async fn suggest_json(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/api/suggest", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Suggest request failed")
    }

    /// POST /api/suggest with `{"emotion": <emotion>}`
    pub async fn suggest(&self, emotion: &str) -> Response {
        self.suggest_json(&serde_json::json!({ "emotion": emotion }))
            .await
    }

    // ========================================================================
    // Scan
    // ========================================================================

    /// POST /api/scan with a JPEG in the `image` field
    pub async fn scan(&self, bytes: &[u8]) -> Response {
        self.scan_form(Self::image_form("image", bytes, TEST_IMAGE_NAME, "image/jpeg"))
            .await
    }

    /// POST /api/scan with a hand-built form
    pub async fn scan_form(&self, form: Form) -> Response {
        self.client
            .post(format!("{}/api/scan", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Scan request failed")
    }
}
