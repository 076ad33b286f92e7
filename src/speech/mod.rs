//! Speech capture and playback channels
//!
//! The traits and null implementations are always built; the microphone
//! (Whisper) and speaker (VITS) implementations need the `audio-io` feature.

pub mod capture;
pub mod playback;
#[cfg(feature = "audio-io")]
pub mod stt;
#[cfg(feature = "audio-io")]
pub mod tts;

pub use capture::{CaptureChannel, CaptureError, UnavailableCapture};
pub use playback::{PlaybackChannel, SilentPlayback, VoiceSettings};
#[cfg(feature = "audio-io")]
pub use stt::{MicCapture, MicCaptureConfig, WhisperConfig, WhisperEngine};
#[cfg(feature = "audio-io")]
pub use tts::{SynthPlayback, VitsConfig, VitsEngine};
