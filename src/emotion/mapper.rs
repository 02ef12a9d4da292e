//! Fixed emotion → recommendation query table.

use serde::Serialize;

use super::EmotionLabel;

/// Seed parameters for a catalog recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationQuery {
    /// Seed genres, in the order they are sent to the catalog.
    pub genres: Vec<String>,
    /// Target valence in `[0, 1]`.
    pub target_valence: f64,
}

impl RecommendationQuery {
    fn new(genres: &[&str], target_valence: f64) -> Self {
        Self {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            target_valence,
        }
    }

    /// Genres joined the way the catalog expects them (`acoustic,piano`).
    pub fn seed_genres(&self) -> String {
        self.genres.join(",")
    }
}

fn default_query() -> RecommendationQuery {
    RecommendationQuery::new(&["pop"], 0.5)
}

pub fn map_emotion(label: &EmotionLabel) -> RecommendationQuery {
    match label {
        EmotionLabel::Happy => RecommendationQuery::new(&["pop"], 0.9),
        EmotionLabel::Sad => RecommendationQuery::new(&["acoustic", "piano"], 0.2),
        EmotionLabel::Angry => RecommendationQuery::new(&["metal", "rock"], 0.3),
        EmotionLabel::Surprised => RecommendationQuery::new(&["indie"], 0.7),
        EmotionLabel::Neutral => RecommendationQuery::new(&["ambient"], 0.5),
        EmotionLabel::Unknown(_) => default_query(),
    }
}

/// Maps a raw label. Strings that don't parse into a label get the default entry.
pub fn map_emotion_str(raw: &str) -> RecommendationQuery {
    match EmotionLabel::parse(raw) {
        Some(label) => map_emotion(&label),
        None => default_query(),
    }
}
