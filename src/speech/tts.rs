//! Text-to-speech playback with sherpa-rs (VITS models) and rodio

use super::playback::{PlaybackChannel, VoiceSettings};
use crate::controller::{EventSender, PlaybackEvent, UtteranceId};
use crate::lifecycle::{LifecycleHooks, Subscription, Visibility};
use crate::{Result, VoicebotError};
use crossbeam_channel::{bounded, unbounded, Sender};
use parking_lot::Mutex;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use sherpa_rs::tts::{VitsTts, VitsTtsConfig};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

#[derive(Clone, Debug, Default)]
pub struct VitsConfig {
    pub model_path: String,
    pub tokens_path: String,
    pub lexicon_path: Option<String>,
    pub data_dir: Option<String>,
    pub speaker_id: i32,
}

pub struct VitsEngine {
    tts: VitsTts,
    speaker_id: i32,
}

impl VitsEngine {
    pub fn new(config: VitsConfig) -> Result<Self> {
        for (what, path) in [("Model", &config.model_path), ("Tokens file", &config.tokens_path)] {
            if path.is_empty() {
                return Err(VoicebotError::ConfigError(format!("{} path is required", what)));
            }
            if !Path::new(path).exists() {
                return Err(VoicebotError::ModelLoadError(format!(
                    "{} not found: {}",
                    what, path
                )));
            }
        }

        info!("Loading VITS voice from: {}", config.model_path);
        let tts = VitsTts::new(VitsTtsConfig {
            model: config.model_path,
            tokens: config.tokens_path,
            lexicon: config.lexicon_path.unwrap_or_default(),
            data_dir: config.data_dir.unwrap_or_default(),
            length_scale: 1.0,
            noise_scale: 0.667,
            noise_scale_w: 0.8,
            ..Default::default()
        });

        Ok(Self {
            tts,
            speaker_id: config.speaker_id,
        })
    }

    /// Returns mono samples and their sample rate
    pub fn synthesize(&mut self, text: &str, speed: f32) -> Result<(Vec<f32>, u32)> {
        let audio = self
            .tts
            .create(text, self.speaker_id, speed)
            .map_err(|e| VoicebotError::TTSError(format!("Synthesis failed: {}", e)))?;
        Ok((audio.samples, audio.sample_rate as u32))
    }
}

/// Sample rate that plays synthesized audio at the requested pitch.
///
/// Pitch is approximated by playback-rate scaling, clamped to the voice range.
pub fn pitched_rate(model_rate: u32, pitch: f32) -> u32 {
    let pitch = if pitch <= 0.0 { 1.0 } else { pitch.clamp(0.5, 2.0) };
    ((model_rate as f32) * pitch).round() as u32
}

struct SpeakJob {
    id: UtteranceId,
    text: String,
    events: EventSender,
}

struct ActiveUtterance {
    id: UtteranceId,
    sink: Arc<Sink>,
}

#[derive(Default)]
struct Shared {
    current: Mutex<Option<ActiveUtterance>>,
    /// Id allowed to start; 0 once cancelled
    latest: AtomicU64,
    hidden: AtomicBool,
}

impl Shared {
    fn silence_current(&self) {
        if let Some(active) = self.current.lock().take() {
            debug!("Stopping utterance {:?}", active.id);
            active.sink.stop();
        }
    }
}

/// Speaker playback of synthesized replies.
///
/// Synthesis runs on a worker thread. Each utterance gets its own sink, so
/// hiding the window pauses it in place and showing it resumes.
pub struct SynthPlayback {
    _stream: OutputStream,
    jobs: Sender<SpeakJob>,
    shared: Arc<Shared>,
    next_id: u64,
    _visibility: Subscription,
}

impl SynthPlayback {
    pub fn new(config: VitsConfig, voice: VoiceSettings, hooks: &LifecycleHooks) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            VoicebotError::AudioDeviceError(format!("Failed to open output stream: {}", e))
        })?;

        let shared = Arc::new(Shared::default());
        shared
            .hidden
            .store(hooks.visibility() == Visibility::Hidden, Ordering::SeqCst);

        let (jobs, job_rx) = unbounded::<SpeakJob>();
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);
        let worker_shared = Arc::clone(&shared);

        thread::Builder::new()
            .name("tts".into())
            .spawn(move || {
                let mut engine = match VitsEngine::new(config) {
                    Ok(engine) => {
                        let _ = ready_tx.send(Ok(()));
                        engine
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                info!("TTS worker ready");
                for job in job_rx {
                    play_job(&mut engine, &handle, &voice, &worker_shared, job);
                }
                info!("TTS worker stopped");
            })
            .map_err(|e| VoicebotError::ChannelError(format!("Failed to spawn worker: {}", e)))?;

        ready_rx
            .recv()
            .map_err(|_| VoicebotError::TTSError("TTS worker exited during startup".into()))??;

        let listener_shared = Arc::clone(&shared);
        let subscription = hooks.subscribe(move |visibility| {
            let hidden = visibility == Visibility::Hidden;
            listener_shared.hidden.store(hidden, Ordering::SeqCst);
            if let Some(active) = listener_shared.current.lock().as_ref() {
                if hidden {
                    debug!("Window hidden, pausing utterance {:?}", active.id);
                    active.sink.pause();
                } else {
                    debug!("Window visible, resuming utterance {:?}", active.id);
                    active.sink.play();
                }
            }
        });

        Ok(Self {
            _stream: stream,
            jobs,
            shared,
            next_id: 0,
            _visibility: subscription,
        })
    }
}

fn play_job(
    engine: &mut VitsEngine,
    handle: &OutputStreamHandle,
    voice: &VoiceSettings,
    shared: &Shared,
    job: SpeakJob,
) {
    let SpeakJob { id, text, events } = job;
    if shared.latest.load(Ordering::SeqCst) != id.0 {
        debug!("Skipping superseded utterance {:?}", id);
        events.send(PlaybackEvent::Ended(id));
        return;
    }

    let (samples, model_rate) = match engine.synthesize(&text, voice.rate) {
        Ok(audio) if !audio.0.is_empty() => audio,
        Ok(_) => {
            events.send(PlaybackEvent::Ended(id));
            return;
        }
        Err(e) => {
            warn!("TTS failed, reply stays text only: {}", e);
            events.send(PlaybackEvent::Ended(id));
            return;
        }
    };

    let sink = match Sink::try_new(handle) {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            error!("Failed to create audio sink: {}", e);
            events.send(PlaybackEvent::Ended(id));
            return;
        }
    };
    sink.set_volume(voice.volume);
    sink.append(SamplesBuffer::new(
        1,
        pitched_rate(model_rate, voice.pitch),
        samples,
    ));

    {
        let mut current = shared.current.lock();
        if shared.latest.load(Ordering::SeqCst) != id.0 {
            sink.stop();
            drop(current);
            events.send(PlaybackEvent::Ended(id));
            return;
        }
        if shared.hidden.load(Ordering::SeqCst) {
            sink.pause();
        }
        *current = Some(ActiveUtterance {
            id,
            sink: Arc::clone(&sink),
        });
    }

    events.send(PlaybackEvent::Started(id));
    sink.sleep_until_end();

    {
        let mut current = shared.current.lock();
        if current.as_ref().is_some_and(|active| active.id == id) {
            *current = None;
        }
    }
    events.send(PlaybackEvent::Ended(id));
}

impl PlaybackChannel for SynthPlayback {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&mut self, text: &str, events: &EventSender) -> Option<UtteranceId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        self.shared.latest.store(id.0, Ordering::SeqCst);
        self.shared.silence_current();

        let job = SpeakJob {
            id,
            text: text.to_string(),
            events: events.clone(),
        };
        if self.jobs.send(job).is_err() {
            error!("TTS worker is gone");
            return None;
        }
        debug!("Queued utterance {:?}", id);
        Some(id)
    }

    fn cancel(&mut self) {
        self.shared.latest.store(0, Ordering::SeqCst);
        self.shared.silence_current();
    }
}
