//! Application configuration
//!
//! Loaded from TOML. Every field has a default, so a partial file (or no
//! file at all) is valid.

use crate::audio::EndpointConfig;
use crate::controller::DEFAULT_GREETING;
use crate::speech::VoiceSettings;
use crate::{Result, VoicebotError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "VOICEBOT_CONFIG";
pub const ENDPOINT_ENV: &str = "VOICEBOT_ENDPOINT";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoicebotConfig {
    /// Seed message of the conversation
    pub greeting: String,
    pub locale: String,
    pub dispatch: DispatchConfig,
    pub capture: CaptureConfig,
    pub playback: PlaybackConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub enabled: bool,
    pub whisper_model: PathBuf,
    pub threads: i32,
    pub speech_threshold: f32,
    pub trailing_silence_secs: f32,
    pub no_speech_timeout_secs: f32,
    pub max_utterance_secs: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub enabled: bool,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub model_path: String,
    pub tokens_path: String,
    pub speaker_id: i32,
}

impl Default for VoicebotConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            locale: "en-US".to_string(),
            dispatch: DispatchConfig::default(),
            capture: CaptureConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/query".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let endpoint = EndpointConfig::default();
        Self {
            enabled: true,
            whisper_model: PathBuf::from("models/ggml-base.en.bin"),
            threads: 4,
            speech_threshold: endpoint.speech_threshold,
            trailing_silence_secs: endpoint.trailing_silence_secs,
            no_speech_timeout_secs: endpoint.no_speech_timeout_secs,
            max_utterance_secs: endpoint.max_utterance_secs,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        let voice = VoiceSettings::default();
        Self {
            enabled: true,
            rate: voice.rate,
            pitch: voice.pitch,
            volume: voice.volume,
            model_path: "models/vits-piper-en_US-amy-low/en_US-amy-low.onnx".to_string(),
            tokens_path: "models/vits-piper-en_US-amy-low/tokens.txt".to_string(),
            speaker_id: 0,
        }
    }
}

impl VoicebotConfig {
    /// Parse a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            VoicebotError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            VoicebotError::ConfigError(msg) => {
                VoicebotError::ConfigError(format!("'{}': {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| VoicebotError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// `$VOICEBOT_CONFIG`, else `<config dir>/voicebot/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("voicebot").join("config.toml")))
    }

    /// Load from the default location, falling back to defaults when no file
    /// exists, then apply environment overrides
    pub fn discover() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                Self::load(&path)?
            }
            _ => {
                debug!("No configuration file, using defaults");
                Self::default()
            }
        };
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.dispatch.endpoint = endpoint.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.dispatch.endpoint).map_err(|e| {
            VoicebotError::ConfigError(format!(
                "Invalid endpoint '{}': {}",
                self.dispatch.endpoint, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(VoicebotError::ConfigError(format!(
                "Endpoint must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.dispatch.timeout_secs == 0 {
            return Err(VoicebotError::ConfigError(
                "Dispatch timeout must be at least one second".into(),
            ));
        }

        check_range("rate", self.playback.rate, 0.1, 10.0)?;
        check_range("pitch", self.playback.pitch, 0.0, 2.0)?;
        check_range("volume", self.playback.volume, 0.0, 1.0)?;

        if self.locale.trim().is_empty() {
            return Err(VoicebotError::ConfigError("Locale must not be empty".into()));
        }
        Ok(())
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.dispatch.endpoint = endpoint.into();
        self
    }

    /// Text input only
    pub fn without_capture(mut self) -> Self {
        self.capture.enabled = false;
        self
    }

    /// Replies shown as text only
    pub fn without_playback(mut self) -> Self {
        self.playback.enabled = false;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch.timeout_secs)
    }

    pub fn voice(&self) -> VoiceSettings {
        VoiceSettings {
            locale: self.locale.clone(),
            rate: self.playback.rate,
            pitch: self.playback.pitch,
            volume: self.playback.volume,
        }
    }

    pub fn endpointing(&self) -> EndpointConfig {
        EndpointConfig {
            speech_threshold: self.capture.speech_threshold,
            trailing_silence_secs: self.capture.trailing_silence_secs,
            no_speech_timeout_secs: self.capture.no_speech_timeout_secs,
            max_utterance_secs: self.capture.max_utterance_secs,
        }
    }

    /// Whisper language code for the locale (`en-US` -> `en`)
    pub fn language(&self) -> Option<String> {
        self.locale
            .split(['-', '_'])
            .next()
            .filter(|lang| !lang.is_empty())
            .map(|lang| lang.to_lowercase())
    }
}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(VoicebotError::ConfigError(format!(
            "Playback {} {} outside {}..={}",
            name, value, min, max
        )));
    }
    Ok(())
}
