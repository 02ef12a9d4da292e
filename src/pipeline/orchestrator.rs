use std::sync::Arc;
use tracing::{debug, warn};

use super::state::{EmotionSource, TrackSource};
use crate::capture::CapturedImage;
use crate::detector::AnalyzeGateway;
use crate::emotion::{EmotionLabel, EmotionPicker};
use crate::spotify::{Track, TrackRecommender};

/// The analyze and recommend stages with their fallbacks.
///
/// Neither stage can fail: a detector failure yields a picked emotion and a
/// catalog failure yields the sample track. Shared by every session.
pub struct ScanPipeline {
    gateway: Arc<dyn AnalyzeGateway>,
    recommender: Arc<TrackRecommender>,
    picker: Arc<dyn EmotionPicker>,
}

impl ScanPipeline {
    pub fn new(
        gateway: Arc<dyn AnalyzeGateway>,
        recommender: Arc<TrackRecommender>,
        picker: Arc<dyn EmotionPicker>,
    ) -> Self {
        Self {
            gateway,
            recommender,
            picker,
        }
    }

    pub async fn detect_emotion(&self, image: CapturedImage) -> (EmotionLabel, EmotionSource) {
        match self.gateway.analyze(image).await {
            Ok(emotion) => {
                debug!("Detector returned emotion {}", emotion);
                (emotion, EmotionSource::Detector)
            }
            Err(err) => {
                let emotion = self.picker.pick();
                warn!("Emotion analysis unavailable ({}), using {}", err, emotion);
                (emotion, EmotionSource::Fallback)
            }
        }
    }

    pub async fn suggest_track(&self, emotion: &EmotionLabel) -> (Track, TrackSource) {
        match self.recommender.recommend_for(emotion).await {
            Ok(track) => {
                debug!("Catalog suggested {:?} by {:?}", track.name, track.artist);
                (track, TrackSource::Catalog)
            }
            Err(err) => {
                warn!(
                    "Recommendation failed for {} ({}), using a sample track",
                    emotion, err
                );
                (Track::sample(emotion), TrackSource::Sample)
            }
        }
    }
}
