use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::capture::CaptureError;
use crate::emotion::EmotionLabel;
use crate::spotify::Track;

/// Where a scan session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    Idle,
    Capturing,
    Analyzing,
    Recommending,
    Done,
    Failed,
}

impl ScanState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Done | ScanState::Failed)
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanState::Idle => "idle",
            ScanState::Capturing => "capturing",
            ScanState::Analyzing => "analyzing",
            ScanState::Recommending => "recommending",
            ScanState::Done => "done",
            ScanState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionSource {
    Detector,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    Catalog,
    Sample,
}

/// The result of one completed scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    emotion: EmotionLabel,
    track: Track,
    emotion_source: EmotionSource,
    track_source: TrackSource,
}

impl Suggestion {
    pub fn new(
        emotion: EmotionLabel,
        track: Track,
        emotion_source: EmotionSource,
        track_source: TrackSource,
    ) -> Self {
        Self {
            emotion,
            track,
            emotion_source,
            track_source,
        }
    }

    pub fn emotion(&self) -> &EmotionLabel {
        &self.emotion
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn emotion_source(&self) -> EmotionSource {
        self.emotion_source
    }

    pub fn track_source(&self) -> TrackSource {
        self.track_source
    }

    /// True when neither stage needed a fallback.
    pub fn is_complete(&self) -> bool {
        self.emotion_source == EmotionSource::Detector && self.track_source == TrackSource::Catalog
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("A scan is already in progress")]
    Busy,

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),
}
