//! Emotion labels and the emotion-to-music mapping.

mod mapper;
mod picker;

pub use mapper::{map_emotion, map_emotion_str, RecommendationQuery};
pub use picker::{EmotionPicker, FixedEmotionPicker, RandomEmotionPicker};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An emotion reported by the detector, or picked locally when it is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Surprised,
    Neutral,
    /// Any other non-empty label, kept exactly as received.
    Unknown(String),
}

impl EmotionLabel {
    /// The closed set fallback emotions are drawn from.
    pub const KNOWN: [EmotionLabel; 5] = [
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Angry,
        EmotionLabel::Surprised,
        EmotionLabel::Neutral,
    ];

    /// Parses a raw label. Only the exact lower-case names are known, and
    /// `None` is returned for the empty string.
    pub fn parse(raw: &str) -> Option<Self> {
        let label = match raw {
            "" => return None,
            "happy" => Self::Happy,
            "sad" => Self::Sad,
            "angry" => Self::Angry,
            "surprised" => Self::Surprised,
            "neutral" => Self::Neutral,
            _ => Self::Unknown(raw.to_string()),
        };
        Some(label)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Surprised => "surprised",
            Self::Neutral => "neutral",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EmotionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EmotionLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        EmotionLabel::parse(&raw).ok_or_else(|| de::Error::custom("empty emotion label"))
    }
}
