//! Single-utterance endpointing
//!
//! Decides when a one-shot capture is over: after speech followed by enough
//! trailing silence, when nothing was said before the no-speech timeout, or
//! when the utterance hits its maximum length.

/// Thresholds for [`UtteranceEndpointer`]
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointConfig {
    /// RMS level above which a chunk counts as speech
    pub speech_threshold: f32,
    pub trailing_silence_secs: f32,
    pub no_speech_timeout_secs: f32,
    pub max_utterance_secs: f32,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            speech_threshold: 0.02,
            trailing_silence_secs: 1.0,
            no_speech_timeout_secs: 8.0,
            max_utterance_secs: 30.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointDecision {
    /// Keep capturing
    Listening,
    /// Speech was heard and has ended
    Complete,
    /// Timed out without hearing speech
    NoSpeech,
}

pub struct UtteranceEndpointer {
    config: EndpointConfig,
    sample_rate: u32,
    samples: Vec<f32>,
    heard_speech: bool,
    silent_samples: usize,
}

impl UtteranceEndpointer {
    pub fn new(config: EndpointConfig, sample_rate: u32) -> Self {
        Self {
            config,
            sample_rate: sample_rate.max(1),
            samples: Vec::new(),
            heard_speech: false,
            silent_samples: 0,
        }
    }

    /// Feed one chunk of mono audio and get the current decision
    pub fn push(&mut self, chunk: &[f32]) -> EndpointDecision {
        if !chunk.is_empty() {
            self.samples.extend_from_slice(chunk);
            if rms(chunk) >= self.config.speech_threshold {
                self.heard_speech = true;
                self.silent_samples = 0;
            } else if self.heard_speech {
                self.silent_samples += chunk.len();
            }
        }
        self.decision()
    }

    pub fn decision(&self) -> EndpointDecision {
        let elapsed = self.seconds(self.samples.len());
        if self.heard_speech {
            if self.seconds(self.silent_samples) >= self.config.trailing_silence_secs
                || elapsed >= self.config.max_utterance_secs
            {
                return EndpointDecision::Complete;
            }
        } else if elapsed >= self.config.no_speech_timeout_secs {
            return EndpointDecision::NoSpeech;
        }
        EndpointDecision::Listening
    }

    pub fn heard_speech(&self) -> bool {
        self.heard_speech
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    fn seconds(&self, samples: usize) -> f32 {
        samples as f32 / self.sample_rate as f32
    }
}

/// Root mean square level of a chunk
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}
