//! Microphone capture with Whisper transcription

use super::capture::{CaptureChannel, CaptureError};
use crate::audio::{
    resample_mono, EndpointConfig, EndpointDecision, MicStream, UtteranceEndpointer,
    WHISPER_SAMPLE_RATE,
};
use crate::controller::{CaptureEvent, EventSender};
use crate::{Result, VoicebotError};
use crossbeam_channel::{bounded, unbounded, RecvTimeoutError, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

#[derive(Clone, Debug)]
pub struct WhisperConfig {
    pub model_path: PathBuf,

    /// Two-letter language code, derived from the capture locale
    pub language: Option<String>,

    pub n_threads: i32,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: Some("en".to_string()),
            n_threads: 4,
        }
    }
}

pub struct WhisperEngine {
    config: WhisperConfig,
    context: WhisperContext,
}

impl WhisperEngine {
    pub fn new(config: WhisperConfig) -> Result<Self> {
        info!("Loading Whisper model from: {:?}", config.model_path);

        if !config.model_path.exists() {
            return Err(VoicebotError::ModelLoadError(format!(
                "Model file not found: {:?}",
                config.model_path
            )));
        }

        let path = config
            .model_path
            .to_str()
            .ok_or_else(|| VoicebotError::ModelLoadError("Invalid model path".to_string()))?;
        let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| {
                VoicebotError::ModelLoadError(format!("Failed to load Whisper model: {:?}", e))
            })?;

        info!("Whisper model loaded");
        Ok(Self { config, context })
    }

    /// Transcribe 16 kHz mono samples into trimmed text
    pub fn transcribe(&self, samples: &[f32]) -> Result<String> {
        if samples.is_empty() {
            return Ok(String::new());
        }

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.n_threads);
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_single_segment(true);
        if let Some(lang) = self.config.language.as_deref() {
            params.set_language(Some(lang));
        }

        let mut state = self.context.create_state().map_err(|e| {
            VoicebotError::TranscriptionError(format!("Failed to create state: {:?}", e))
        })?;
        state.full(params, samples).map_err(|e| {
            VoicebotError::TranscriptionError(format!("Transcription failed: {:?}", e))
        })?;

        let segments = state.full_n_segments().map_err(|e| {
            VoicebotError::TranscriptionError(format!("Failed to get segments: {:?}", e))
        })?;

        let mut text = String::new();
        for i in 0..segments {
            let segment = state.full_get_segment_text(i).map_err(|e| {
                VoicebotError::TranscriptionError(format!("Failed to get segment text: {:?}", e))
            })?;
            text.push_str(&segment);
        }

        let text = text.trim().to_string();
        debug!("Transcription result: '{}'", text);
        Ok(text)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MicCaptureConfig {
    pub whisper: WhisperConfig,
    pub endpoint: EndpointConfig,
}

struct TranscribeJob {
    samples: Vec<f32>,
    events: EventSender,
}

struct Session {
    stop: Arc<AtomicBool>,
    /// Set with `stop` when heard speech must not be transcribed
    discard: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// One-shot microphone capture.
///
/// Each `start` opens the default input device on a session thread that
/// endpoints the utterance; finished utterances go to a long-lived Whisper
/// worker which posts the transcript and the end notification.
pub struct MicCapture {
    endpoint: EndpointConfig,
    jobs: Sender<TranscribeJob>,
    session: Option<Session>,
}

impl MicCapture {
    /// Load the model and start the transcription worker
    pub fn new(config: MicCaptureConfig) -> Result<Self> {
        let host_has_input = {
            use cpal::traits::HostTrait;
            cpal::default_host().default_input_device().is_some()
        };
        if !host_has_input {
            return Err(VoicebotError::AudioDeviceError(
                "No input device available".into(),
            ));
        }

        let engine = WhisperEngine::new(config.whisper)?;
        let (jobs, job_rx) = unbounded::<TranscribeJob>();

        thread::Builder::new()
            .name("whisper".into())
            .spawn(move || {
                info!("Transcription worker ready");
                for job in job_rx {
                    match engine.transcribe(&job.samples) {
                        Ok(text) if text.is_empty() => {
                            job.events.send(CaptureEvent::Error(CaptureError::NoSpeech))
                        }
                        Ok(text) => job.events.send(CaptureEvent::Transcript(text)),
                        Err(e) => {
                            warn!("Transcription failed: {}", e);
                            job.events.send(CaptureEvent::Error(CaptureError::Transcription(
                                e.to_string(),
                            )));
                        }
                    }
                    job.events.send(CaptureEvent::End);
                }
                info!("Transcription worker stopped");
            })
            .map_err(|e| VoicebotError::ChannelError(format!("Failed to spawn worker: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint,
            jobs,
            session: None,
        })
    }
}

enum SessionOutcome {
    Utterance(Vec<f32>, u32),
    NoSpeech,
    Stopped,
    DeviceLost,
}

fn run_session(
    endpoint: EndpointConfig,
    stop: Arc<AtomicBool>,
    discard: Arc<AtomicBool>,
    ready: Sender<std::result::Result<(), CaptureError>>,
    jobs: Sender<TranscribeJob>,
    events: EventSender,
) {
    // The input stream is opened and dropped on this thread only
    let mut mic = match MicStream::open_default() {
        Ok(mic) => mic,
        Err(e) => {
            let _ = ready.send(Err(CaptureError::AudioCapture(e.to_string())));
            return;
        }
    };
    let (chunk_tx, chunk_rx) = bounded::<Vec<f32>>(256);
    if let Err(e) = mic.start(chunk_tx) {
        let _ = ready.send(Err(CaptureError::AudioCapture(e.to_string())));
        return;
    }
    let _ = ready.send(Ok(()));

    let mut endpointer = UtteranceEndpointer::new(endpoint, mic.sample_rate());
    let outcome = loop {
        if stop.load(Ordering::SeqCst) {
            break if endpointer.heard_speech() && !discard.load(Ordering::SeqCst) {
                let rate = endpointer.sample_rate();
                SessionOutcome::Utterance(endpointer.into_samples(), rate)
            } else {
                SessionOutcome::Stopped
            };
        }
        match chunk_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(chunk) => match endpointer.push(&chunk) {
                EndpointDecision::Listening => {}
                EndpointDecision::Complete => {
                    let rate = endpointer.sample_rate();
                    break SessionOutcome::Utterance(endpointer.into_samples(), rate);
                }
                EndpointDecision::NoSpeech => break SessionOutcome::NoSpeech,
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break SessionOutcome::DeviceLost,
        }
    };
    mic.stop();

    match outcome {
        SessionOutcome::Utterance(samples, rate) => {
            debug!(
                "Utterance captured: {:.2}s",
                samples.len() as f32 / rate as f32
            );
            match resample_mono(&samples, rate, WHISPER_SAMPLE_RATE) {
                Ok(samples) => {
                    let job = TranscribeJob {
                        samples,
                        events: events.clone(),
                    };
                    if jobs.send(job).is_ok() {
                        return;
                    }
                    error!("Transcription worker is gone");
                    events.send(CaptureEvent::Error(CaptureError::Transcription(
                        "worker unavailable".into(),
                    )));
                }
                Err(e) => {
                    events.send(CaptureEvent::Error(CaptureError::Transcription(
                        e.to_string(),
                    )));
                }
            }
        }
        SessionOutcome::NoSpeech => events.send(CaptureEvent::Error(CaptureError::NoSpeech)),
        SessionOutcome::DeviceLost => events.send(CaptureEvent::Error(
            CaptureError::AudioCapture("input stream closed".into()),
        )),
        SessionOutcome::Stopped => debug!("Capture stopped, nothing to transcribe"),
    }
    events.send(CaptureEvent::End);
}

impl CaptureChannel for MicCapture {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self, events: &EventSender) -> std::result::Result<(), CaptureError> {
        if self.session.is_some() {
            return Err(CaptureError::AlreadyActive);
        }

        let stop = Arc::new(AtomicBool::new(false));
        let discard = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = bounded(1);
        let endpoint = self.endpoint.clone();
        let jobs = self.jobs.clone();
        let session_events = events.clone();
        let session_stop = Arc::clone(&stop);
        let session_discard = Arc::clone(&discard);

        let handle = thread::Builder::new()
            .name("capture".into())
            .spawn(move || {
                run_session(
                    endpoint,
                    session_stop,
                    session_discard,
                    ready_tx,
                    jobs,
                    session_events,
                )
            })
            .map_err(|e| CaptureError::AudioCapture(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!("Capture started");
                self.session = Some(Session {
                    stop,
                    discard,
                    handle,
                });
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(CaptureError::AudioCapture("capture thread exited".into()))
            }
        }
    }

    fn stop(&mut self) {
        if let Some(session) = &self.session {
            debug!("Capture stop requested");
            session.stop.store(true, Ordering::SeqCst);
        }
    }

    fn abort(&mut self) {
        if let Some(session) = &self.session {
            debug!("Capture abort requested");
            session.discard.store(true, Ordering::SeqCst);
            session.stop.store(true, Ordering::SeqCst);
        }
    }

    fn finished(&mut self) {
        if let Some(session) = self.session.take() {
            if session.handle.join().is_err() {
                error!("Capture session thread panicked");
            }
        }
    }
}
