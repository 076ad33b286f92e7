pub mod endpoint;
#[cfg(feature = "audio-io")]
pub mod input;
pub mod resample;

pub use endpoint::{EndpointConfig, EndpointDecision, UtteranceEndpointer};
#[cfg(feature = "audio-io")]
pub use input::MicStream;
pub use resample::{resample_mono, WHISPER_SAMPLE_RATE};
