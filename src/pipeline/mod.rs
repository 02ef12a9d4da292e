//! Capture, analyze and recommend, with a fallback for every external stage.

mod orchestrator;
mod session;
mod state;

pub use orchestrator::ScanPipeline;
pub use session::ScanSession;
pub use state::{EmotionSource, ScanError, ScanState, Suggestion, TrackSource};
