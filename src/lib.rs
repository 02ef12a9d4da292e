//! Moodtune server library
//!
//! Turns a camera frame into a music suggestion: the frame goes to an emotion
//! detector, the emotion becomes a catalog query, and the catalog picks a track.
//! Both binaries and the end-to-end tests are built on these modules.

pub mod capture;
pub mod config;
pub mod detector;
pub mod emotion;
pub mod pipeline;
pub mod server;
pub mod spotify;

// Re-export commonly used types for convenience
pub use config::{AppConfig, CliConfig, FileConfig, ServiceArgs};
pub use emotion::EmotionLabel;
pub use pipeline::{ScanPipeline, ScanSession, Suggestion};
pub use server::{run_server, RequestsLoggingLevel};
