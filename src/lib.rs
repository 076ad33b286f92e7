pub mod audio;
pub mod controller;
pub mod dispatch;
pub mod integration;
pub mod lifecycle;
pub mod messages;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum VoicebotError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Model load error: {0}")]
    ModelLoadError(String),

    #[error("Transcription error: {0}")]
    TranscriptionError(String),

    #[error("TTS error: {0}")]
    TTSError(String),

    #[error("Dispatch error: {0}")]
    DispatchError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for VoicebotError {
    fn from(e: std::io::Error) -> Self {
        VoicebotError::IOError(e.to_string())
    }
}

impl VoicebotError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            VoicebotError::AudioDeviceError(_) => false,
            // Model errors require restarting
            VoicebotError::ModelLoadError(_) => false,
            VoicebotError::TranscriptionError(_) => true,
            VoicebotError::TTSError(_) => true,
            VoicebotError::DispatchError(_) => true,
            VoicebotError::IOError(_) => false,
            VoicebotError::AudioProcessingError(_) => true,
            VoicebotError::ConfigError(_) => false,
            VoicebotError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            VoicebotError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            VoicebotError::ModelLoadError(_) => {
                "Failed to load a speech model. Please verify model files are present.".to_string()
            }
            VoicebotError::TranscriptionError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            VoicebotError::TTSError(_) => {
                "Text-to-speech failed. Response will be shown as text.".to_string()
            }
            VoicebotError::DispatchError(_) => {
                "Could not reach the assistant. Please try again.".to_string()
            }
            VoicebotError::IOError(_) => "File system error occurred.".to_string(),
            VoicebotError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            VoicebotError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            VoicebotError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, VoicebotError>;
