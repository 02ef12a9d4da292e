use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::responses::{ErrorResponse, MISSING_EMOTION};
use super::state::GuardedTrackRecommender;
use crate::emotion::EmotionLabel;
use crate::spotify::{RecommendationError, Track};

#[derive(Serialize)]
struct SuggestResponse {
    track: Track,
}

/// The `emotion` member of a suggest body.
///
/// Strings are taken as-is and other non-zero scalars by their JSON text.
/// Empty strings, `null`, `false`, `0` and containers count as missing.
fn requested_emotion(body: &Value) -> Option<EmotionLabel> {
    match body.as_object()?.get("emotion")? {
        Value::String(raw) => EmotionLabel::parse(raw),
        Value::Bool(true) => EmotionLabel::parse("true"),
        Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => {
            EmotionLabel::parse(&n.to_string())
        }
        _ => None,
    }
}

/// POST /suggest - One catalog track for a given emotion
pub(super) async fn suggest(
    State(recommender): State<GuardedTrackRecommender>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let emotion = match body.ok().and_then(|Json(body)| requested_emotion(&body)) {
        Some(emotion) => emotion,
        None => {
            return ErrorResponse::new(MISSING_EMOTION).into_response_with(StatusCode::BAD_REQUEST)
        }
    };
    debug!("Suggesting a track for {}", emotion);

    match recommender.recommend_for(&emotion).await {
        Ok(track) => Json(SuggestResponse { track }).into_response(),
        Err(RecommendationError::NoRecommendations) => {
            warn!("No recommendations for {}", emotion);
            ErrorResponse::new("no_recommendations")
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(err) => {
            warn!("Suggestion for {} failed: {}", emotion, err);
            ErrorResponse::with_detail("suggest_failed", &err)
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
