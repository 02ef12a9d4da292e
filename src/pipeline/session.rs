use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use super::orchestrator::ScanPipeline;
use super::state::{ScanError, ScanState, Suggestion};
use crate::capture::CaptureSurface;

/// One user's scan button: at most one scan in flight at a time.
pub struct ScanSession {
    pipeline: Arc<ScanPipeline>,
    state: Mutex<ScanState>,
    last_outcome: Mutex<Option<ScanState>>,
}

impl ScanSession {
    pub fn new(pipeline: Arc<ScanPipeline>) -> Self {
        Self {
            pipeline,
            state: Mutex::new(ScanState::Idle),
            last_outcome: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ScanState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Terminal state of the most recent scan, if any finished.
    pub fn last_outcome(&self) -> Option<ScanState> {
        *self
            .last_outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs capture, analyze and recommend in order.
    ///
    /// Only capture failures are returned; the later stages fall back.
    pub async fn scan(&self, surface: &dyn CaptureSurface) -> Result<Suggestion, ScanError> {
        let run = self.begin()?;

        let image = match surface.capture().await {
            Ok(image) => image,
            Err(err) => {
                run.finish(ScanState::Failed);
                return Err(err.into());
            }
        };
        debug!("Captured {} bytes of {}", image.len(), image.media_type());

        run.advance(ScanState::Analyzing);
        let (emotion, emotion_source) = self.pipeline.detect_emotion(image).await;

        run.advance(ScanState::Recommending);
        let (track, track_source) = self.pipeline.suggest_track(&emotion).await;

        run.finish(ScanState::Done);
        Ok(Suggestion::new(emotion, track, emotion_source, track_source))
    }

    fn begin(&self) -> Result<InFlight<'_>, ScanError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != ScanState::Idle {
            return Err(ScanError::Busy);
        }
        *state = ScanState::Capturing;
        debug!("Scan state: idle -> capturing");
        Ok(InFlight { session: self })
    }

    fn set_state(&self, next: ScanState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        debug!("Scan state: {} -> {}", *state, next);
        *state = next;
    }
}

/// Marks a session busy; puts it back to idle when dropped, including when
/// the scan future is dropped halfway.
struct InFlight<'a> {
    session: &'a ScanSession,
}

impl InFlight<'_> {
    fn advance(&self, next: ScanState) {
        self.session.set_state(next);
    }

    fn finish(self, outcome: ScanState) {
        self.session.set_state(outcome);
        *self
            .session
            .last_outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(outcome);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.session.set_state(ScanState::Idle);
    }
}
