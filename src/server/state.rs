use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;
use crate::detector::AnalyzeGateway;
use crate::emotion::EmotionPicker;
use crate::pipeline::ScanPipeline;
use crate::spotify::TrackRecommender;

pub type GuardedAnalyzeGateway = Arc<dyn AnalyzeGateway>;
pub type GuardedTrackRecommender = Arc<TrackRecommender>;
pub type GuardedScanPipeline = Arc<ScanPipeline>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub gateway: GuardedAnalyzeGateway,
    pub recommender: GuardedTrackRecommender,
    pub pipeline: GuardedScanPipeline,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        gateway: GuardedAnalyzeGateway,
        recommender: GuardedTrackRecommender,
        picker: Arc<dyn EmotionPicker>,
    ) -> Self {
        let pipeline = Arc::new(ScanPipeline::new(
            gateway.clone(),
            recommender.clone(),
            picker,
        ));
        ServerState {
            config,
            start_time: Instant::now(),
            gateway,
            recommender,
            pipeline,
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedAnalyzeGateway {
    fn from_ref(input: &ServerState) -> Self {
        input.gateway.clone()
    }
}

impl FromRef<ServerState> for GuardedTrackRecommender {
    fn from_ref(input: &ServerState) -> Self {
        input.recommender.clone()
    }
}

impl FromRef<ServerState> for GuardedScanPipeline {
    fn from_ref(input: &ServerState) -> Self {
        input.pipeline.clone()
    }
}
