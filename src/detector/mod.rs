mod client;
mod scratch;

pub use client::{emotion_from_response, AnalysisError, AnalyzeGateway, DetectorClient, IMAGE_FIELD};
pub use scratch::{ScratchDir, StagedImage};
