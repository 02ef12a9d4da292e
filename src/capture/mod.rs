//! Frame acquisition.
//!
//! The camera itself lives on the client; on this side a capture surface is
//! either a frame that was already uploaded or a still image read from disk.

mod image;

pub use image::{CapturedImage, DEFAULT_FILE_STEM, DEFAULT_MEDIA_TYPE};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no frame was provided")]
    NoFrame,

    #[error("captured frame is empty")]
    EmptyFrame,

    #[error("failed to read frame from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait CaptureSurface: Send + Sync {
    async fn capture(&self) -> Result<CapturedImage, CaptureError>;
}

/// A frame captured by the client and handed over with the request.
///
/// The frame can be taken once; later captures report [`CaptureError::NoFrame`].
pub struct UploadedFrame {
    frame: Mutex<Option<CapturedImage>>,
}

impl UploadedFrame {
    pub fn new(frame: Option<CapturedImage>) -> Self {
        Self {
            frame: Mutex::new(frame),
        }
    }
}

#[async_trait]
impl CaptureSurface for UploadedFrame {
    async fn capture(&self) -> Result<CapturedImage, CaptureError> {
        self.frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(CaptureError::NoFrame)
    }
}

/// Reads a still image from disk on every capture.
pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CaptureSurface for FileCapture {
    async fn capture(&self) -> Result<CapturedImage, CaptureError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| CaptureError::Io {
                path: self.path.clone(),
                source,
            })?;
        let filename = self.path.file_name().and_then(|name| name.to_str());
        CapturedImage::new(bytes, None, filename)
    }
}
