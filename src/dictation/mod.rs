//! Voice Dictation Bridge: wraps a continuous speech-recognition session,
//! merging finalized transcript segments into accumulated text and keeping
//! the interim (unconfirmed) segment separate.

use crate::capabilities::{Microphone, SpeechRecognizer};
use crate::error::{AppError, Device, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationErrorKind {
    PermissionDenied,
    Network,
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationState {
    Idle,
    Connecting,
    Listening,
    Error(DictationErrorKind),
}

/// Session state machine for voice dictation. Finalized segments are merged
/// into `accumulated`; the interim segment is preview-only and is discarded,
/// never promoted, when superseded or when the session ends.
pub struct DictationBridge {
    state: DictationState,
    accumulated: String,
    interim: String,
}

impl Default for DictationBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl DictationBridge {
    pub fn new() -> Self {
        Self {
            state: DictationState::Idle,
            accumulated: String::new(),
            interim: String::new(),
        }
    }

    pub fn state(&self) -> DictationState {
        self.state
    }

    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    /// Accumulated plus interim text, for display and for the symptom field
    /// at submit time.
    pub fn preview(&self) -> String {
        if self.interim.is_empty() {
            self.accumulated.clone()
        } else {
            join_segment(&self.accumulated, &self.interim)
        }
    }

    /// Start a dictation session. Microphone permission is confirmed via a
    /// short-lived probe stream, released immediately and independent of the
    /// recognizer's own stream; only then is the recognizer engaged.
    pub fn start(
        &mut self,
        microphone: &mut dyn Microphone,
        recognizer: &mut dyn SpeechRecognizer,
    ) -> Result<()> {
        if self.state != DictationState::Idle {
            return Err(AppError::Validation(
                "Dictation is already running".to_string(),
            ));
        }
        match microphone.open() {
            Ok(mut probe) => probe.stop(),
            Err(_) => {
                self.state = DictationState::Error(DictationErrorKind::PermissionDenied);
                return Err(AppError::Permission(Device::Microphone));
            }
        }
        if let Err(err) = recognizer.start() {
            self.state = DictationState::Error(DictationErrorKind::Unsupported);
            return Err(err);
        }
        self.state = DictationState::Connecting;
        Ok(())
    }

    /// Explicit stop. Terminates the recognizer session and discards any
    /// pending interim text; it is never silently promoted to final.
    pub fn stop(&mut self, recognizer: &mut dyn SpeechRecognizer) {
        recognizer.stop();
        self.interim.clear();
        self.state = DictationState::Idle;
    }

    /// Recognizer start event.
    pub fn on_start(&mut self) {
        if self.state == DictationState::Connecting {
            self.state = DictationState::Listening;
        }
    }

    /// One recognition update: zero or more finalized segments, at most one
    /// interim segment. Finalized segments are appended in delivery order;
    /// the interim segment replaces the previous interim wholesale.
    pub fn on_result(&mut self, final_segments: &[&str], interim: Option<&str>) {
        for segment in final_segments {
            self.accumulated = join_segment(&self.accumulated, segment);
        }
        self.interim = interim.unwrap_or_default().to_string();
    }

    /// Recognizer error event. The subtype is preserved so the caller can
    /// surface permission, network, and unsupported failures distinctly.
    pub fn on_error(&mut self, kind: DictationErrorKind) {
        self.interim.clear();
        self.state = DictationState::Error(kind);
    }

    /// Recognizer end event (session terminated from the service side).
    pub fn on_end(&mut self) {
        self.interim.clear();
        if matches!(
            self.state,
            DictationState::Connecting | DictationState::Listening
        ) {
            self.state = DictationState::Idle;
        }
    }

    /// Acknowledge a surfaced error and return to Idle so a fresh session
    /// can start.
    pub fn dismiss_error(&mut self) {
        if matches!(self.state, DictationState::Error(_)) {
            self.state = DictationState::Idle;
        }
    }

    /// Seed accumulated text (typed by hand before dictation started).
    pub fn set_accumulated(&mut self, text: impl Into<String>) {
        self.accumulated = text.into();
    }

    pub fn clear(&mut self) {
        self.accumulated.clear();
        self.interim.clear();
    }
}

/// Append with a single separating space unless the existing text is empty
/// or already ends in whitespace.
fn join_segment(existing: &str, segment: &str) -> String {
    if existing.is_empty() {
        segment.to_string()
    } else if existing.ends_with(char::is_whitespace) {
        format!("{existing}{segment}")
    } else {
        format!("{existing} {segment}")
    }
}
