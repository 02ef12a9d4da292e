//! Source of fallback emotions used when the detector can't be reached.

use rand::Rng;

use super::EmotionLabel;

/// Picks an emotion when analysis is unavailable.
///
/// Implementations must only return labels from [`EmotionLabel::KNOWN`].
pub trait EmotionPicker: Send + Sync {
    fn pick(&self) -> EmotionLabel;
}

/// Uniform pick over the known emotions, backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomEmotionPicker;

impl EmotionPicker for RandomEmotionPicker {
    fn pick(&self) -> EmotionLabel {
        let index = rand::rng().random_range(0..EmotionLabel::KNOWN.len());
        EmotionLabel::KNOWN[index].clone()
    }
}

/// Always returns the same emotion.
#[derive(Debug, Clone)]
pub struct FixedEmotionPicker(pub EmotionLabel);

impl EmotionPicker for FixedEmotionPicker {
    fn pick(&self) -> EmotionLabel {
        self.0.clone()
    }
}
