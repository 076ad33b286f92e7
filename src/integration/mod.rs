//! Configuration and wiring of the voicebot

pub mod config;
pub mod orchestrator;

pub use config::VoicebotConfig;
pub use orchestrator::{select_capture, select_playback, VoicebotBuilder};
