//! Wires configuration, platform channels and the controller together
//!
//! Platform capabilities are probed once here; whatever is missing is
//! replaced by the null channel for the lifetime of the controller.

use super::config::VoicebotConfig;
use crate::controller::{Controller, Presenter};
use crate::dispatch::{HttpDispatch, QueryClient};
use crate::lifecycle::LifecycleHooks;
use crate::speech::{CaptureChannel, PlaybackChannel, SilentPlayback, UnavailableCapture};
use crate::{Result, VoicebotError};
use tokio::runtime::Handle;
use tracing::info;
#[cfg(feature = "audio-io")]
use tracing::warn;

/// Builder for a fully wired [`Controller`]
pub struct VoicebotBuilder {
    config: VoicebotConfig,
    hooks: LifecycleHooks,
    runtime: Option<Handle>,
    waker: Option<Box<dyn Fn() + Send + Sync>>,
}

impl VoicebotBuilder {
    pub fn new(config: VoicebotConfig) -> Self {
        Self {
            config,
            hooks: LifecycleHooks::new(),
            runtime: None,
            waker: None,
        }
    }

    /// Share visibility hooks with the hosting window
    pub fn with_hooks(mut self, hooks: LifecycleHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Box::new(waker));
        self
    }

    pub fn build<V: Presenter>(self, presenter: V) -> Result<Controller<V>> {
        self.config.validate()?;

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|e| {
                VoicebotError::ConfigError(format!("No tokio runtime for dispatch: {}", e))
            })?,
        };
        let client = QueryClient::new(self.config.dispatch.endpoint.clone(), self.config.timeout())
            .map_err(|e| VoicebotError::DispatchError(e.to_string()))?;
        info!("Dispatching queries to {}", client.endpoint());

        let mut builder = Controller::<V>::builder()
            .with_greeting(self.config.greeting.clone())
            .with_dispatch(HttpDispatch::new(client, runtime))
            .with_boxed_capture(select_capture(&self.config))
            .with_boxed_playback(select_playback(&self.config, &self.hooks));
        if let Some(waker) = self.waker {
            builder = builder.with_waker(waker);
        }
        builder.build(presenter)
    }
}

/// Microphone capture when enabled and available, else the null channel
pub fn select_capture(config: &VoicebotConfig) -> Box<dyn CaptureChannel> {
    if !config.capture.enabled {
        info!("Speech capture disabled by configuration");
        return Box::new(UnavailableCapture);
    }

    #[cfg(feature = "audio-io")]
    {
        use crate::speech::{MicCapture, MicCaptureConfig, WhisperConfig};

        let mic_config = MicCaptureConfig {
            whisper: WhisperConfig {
                model_path: config.capture.whisper_model.clone(),
                language: config.language(),
                n_threads: config.capture.threads,
            },
            endpoint: config.endpointing(),
        };
        match MicCapture::new(mic_config) {
            Ok(capture) => return Box::new(capture),
            Err(e) => warn!("Speech capture unavailable: {}", e),
        }
    }

    #[cfg(not(feature = "audio-io"))]
    info!("Built without audio-io, speech capture unavailable");

    Box::new(UnavailableCapture)
}

/// Synthesized playback when enabled and available, else the null channel
pub fn select_playback(config: &VoicebotConfig, hooks: &LifecycleHooks) -> Box<dyn PlaybackChannel> {
    if !config.playback.enabled {
        info!("Speech playback disabled by configuration");
        return Box::new(SilentPlayback);
    }

    #[cfg(feature = "audio-io")]
    {
        use crate::speech::{SynthPlayback, VitsConfig};

        let vits = VitsConfig {
            model_path: config.playback.model_path.clone(),
            tokens_path: config.playback.tokens_path.clone(),
            speaker_id: config.playback.speaker_id,
            ..Default::default()
        };
        match SynthPlayback::new(vits, config.voice(), hooks) {
            Ok(playback) => return Box::new(playback),
            Err(e) => warn!("Speech playback unavailable: {}", e),
        }
    }

    #[cfg(not(feature = "audio-io"))]
    {
        let _ = hooks;
        info!("Built without audio-io, speech playback unavailable");
    }

    Box::new(SilentPlayback)
}
