//! Capture channel boundary

use crate::controller::EventSender;
use thiserror::Error;

/// Capture failures, displayed as browser-style error codes.
///
/// The detail strings are kept for logs; the user only sees the code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("no-speech")]
    NoSpeech,

    #[error("aborted")]
    Aborted,

    #[error("audio-capture")]
    AudioCapture(String),

    #[error("transcription-failed")]
    Transcription(String),

    #[error("unavailable")]
    Unavailable,

    #[error("already-active")]
    AlreadyActive,
}

impl CaptureError {
    pub fn detail(&self) -> Option<&str> {
        match self {
            CaptureError::AudioCapture(detail) | CaptureError::Transcription(detail) => {
                Some(detail)
            }
            _ => None,
        }
    }
}

/// Single-shot speech capture.
///
/// After a successful `start`, an implementation posts exactly one of
/// `Transcript` or `Error`, then `End`. After `stop` or `abort`, `End`
/// always follows.
pub trait CaptureChannel {
    /// Fixed at construction
    fn is_available(&self) -> bool;

    fn start(&mut self, events: &EventSender) -> Result<(), CaptureError>;

    /// End the session early, finalizing any speech already heard
    fn stop(&mut self);

    /// End the session early and discard any speech already heard
    fn abort(&mut self) {
        self.stop();
    }

    /// Called once the end notification has been handled
    fn finished(&mut self) {}
}

/// Stand-in when no capture capability exists
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableCapture;

impl CaptureChannel for UnavailableCapture {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self, _events: &EventSender) -> Result<(), CaptureError> {
        Err(CaptureError::Unavailable)
    }

    fn stop(&mut self) {}
}
