//! Interaction controller
//!
//! Owns the interaction state and the message log, sequences the capture,
//! dispatch and playback channels, and presents every transition.

use super::events::{
    event_channel, CaptureEvent, ControllerEvent, EventSender, PlaybackEvent, UtteranceId,
};
use super::state::{InteractionState, Presenter, Surface};
use crate::dispatch::{DispatchChannel, DispatchError};
use crate::messages::{Message, MessageLog};
use crate::speech::{CaptureChannel, CaptureError, PlaybackChannel, SilentPlayback, UnavailableCapture};
use crate::{Result, VoicebotError};
use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

pub const DEFAULT_GREETING: &str = "Hello! I'm your voice assistant. How can I help you today?";

pub const CAPTURE_UNAVAILABLE_NOTICE: &str =
    "Speech recognition is not available. Please use the text input.";

pub struct Controller<V: Presenter> {
    state: InteractionState,

    /// Set while a dispatch is in flight
    processing: bool,

    /// Platform capture session open (started, end not yet received)
    capture_session: bool,

    /// Utterance whose notifications are honored
    utterance: Option<UtteranceId>,

    log: MessageLog,
    capture: Box<dyn CaptureChannel>,
    capture_available: bool,
    dispatch: Box<dyn DispatchChannel>,
    playback: Box<dyn PlaybackChannel>,
    presenter: V,
    events: EventSender,
    event_rx: Receiver<ControllerEvent>,
}

impl<V: Presenter> Controller<V> {
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::new()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn surface(&self) -> Surface {
        Surface::for_state(self.state, self.capture_available)
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn capture_available(&self) -> bool {
        self.capture_available
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn presenter(&self) -> &V {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut V {
        &mut self.presenter
    }

    /// Handle for posting events into this controller's queue
    pub fn event_sender(&self) -> EventSender {
        self.events.clone()
    }

    /// Begin voice capture. Only acts from `Idle` with an idle capture channel.
    pub fn request_capture(&mut self) {
        if !self.capture_available {
            debug!("Capture requested but not available");
            return;
        }
        if !self.state.is_idle() || self.processing {
            debug!("Capture requested while {}, ignoring", self.state);
            return;
        }
        if self.capture_session {
            debug!("Previous capture session still closing, ignoring request");
            return;
        }

        match self.capture.start(&self.events) {
            Ok(()) => {
                self.capture_session = true;
                self.transition(InteractionState::Listening);
            }
            Err(e) => {
                warn!("Capture failed to start: {}", e);
                self.append(Message::bot(format!("Error: {}", e)));
                self.transition(InteractionState::Error);
                self.transition(InteractionState::Idle);
            }
        }
    }

    /// Stop an active capture. `Idle` follows when the end notification arrives.
    pub fn cancel_capture(&mut self) {
        if !self.state.is_listening() {
            debug!("Cancel requested while {}, ignoring", self.state);
            return;
        }
        self.capture.stop();
    }

    /// Submit a query. Returns whether it was accepted.
    pub fn submit_text(&mut self, text: &str) -> bool {
        let query = text.trim();
        if query.is_empty() {
            return false;
        }
        if self.processing {
            debug!("Query in flight, dropping submission");
            return false;
        }

        match self.state {
            InteractionState::Listening => self.capture.abort(),
            InteractionState::Speaking => {
                self.playback.cancel();
                self.utterance = None;
            }
            _ => {}
        }

        self.append(Message::user(query));
        self.processing = true;
        self.transition(InteractionState::Processing);

        info!("Dispatching query ({} chars)", query.len());
        self.dispatch.dispatch(query.to_string(), self.events.clone());
        true
    }

    /// Submit a transcript. Only honored while listening; a transcript from
    /// a session the controller already left is dropped.
    pub fn on_capture_result(&mut self, transcript: &str) {
        if !self.state.is_listening() {
            debug!("Ignoring transcript received while {}", self.state);
            return;
        }
        debug!("Transcript received: {}", transcript);
        self.submit_text(transcript);
    }

    pub fn on_capture_error(&mut self, error: &CaptureError) {
        warn!("Capture error: {}", error);
        self.append(Message::bot(format!("Error: {}", error)));
        if self.state.is_listening() {
            self.transition(InteractionState::Error);
            self.transition(InteractionState::Idle);
        }
    }

    pub fn on_capture_end(&mut self) {
        self.capture_session = false;
        self.capture.finished();
        if self.state.is_listening() {
            self.transition(InteractionState::Idle);
        }
    }

    pub fn on_dispatch_complete(&mut self, outcome: std::result::Result<String, DispatchError>) {
        if !self.processing {
            warn!("Dispatch outcome with no query in flight, ignoring");
            return;
        }
        self.processing = false;

        match outcome {
            Ok(reply) => {
                self.append(Message::bot(reply.clone()));
                match self.playback.speak(&reply, &self.events) {
                    Some(id) => {
                        self.utterance = Some(id);
                        self.transition(InteractionState::Speaking);
                    }
                    None => self.transition(InteractionState::Idle),
                }
            }
            Err(e) => {
                warn!("Dispatch failed: {}", e);
                self.append(Message::bot(format!("Sorry, I encountered an error: {}", e)));
                self.transition(InteractionState::Idle);
            }
        }
    }

    pub fn on_playback_start(&mut self, id: UtteranceId) {
        if self.utterance != Some(id) {
            debug!("Ignoring start of superseded utterance {:?}", id);
            return;
        }
        if !self.state.is_speaking() {
            self.transition(InteractionState::Speaking);
        }
    }

    pub fn on_playback_end(&mut self, id: UtteranceId) {
        if self.utterance != Some(id) {
            debug!("Ignoring end of superseded utterance {:?}", id);
            return;
        }
        self.utterance = None;
        if self.state.is_speaking() {
            self.transition(InteractionState::Idle);
        }
    }

    /// Truncate the log to its seed message. State is untouched.
    pub fn clear_log(&mut self) {
        self.log.clear_to_seed();
        let seed = self.log.seed();
        self.presenter.log_cleared(&seed);
        info!("Conversation cleared");
    }

    /// Route every queued channel event, in arrival order
    pub fn poll_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    pub fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::Capture(CaptureEvent::Transcript(text)) => {
                self.on_capture_result(&text)
            }
            ControllerEvent::Capture(CaptureEvent::Error(e)) => self.on_capture_error(&e),
            ControllerEvent::Capture(CaptureEvent::End) => self.on_capture_end(),
            ControllerEvent::Dispatch(outcome) => self.on_dispatch_complete(outcome),
            ControllerEvent::Playback(PlaybackEvent::Started(id)) => self.on_playback_start(id),
            ControllerEvent::Playback(PlaybackEvent::Ended(id)) => self.on_playback_end(id),
        }
    }

    fn append(&mut self, message: Message) {
        self.presenter.message_appended(&message);
        self.log.push(message);
    }

    fn transition(&mut self, next: InteractionState) {
        debug!("State {} -> {}", self.state, next);
        self.state = next;
        let surface = self.surface();
        self.presenter.present(&surface);
    }
}

/// Builder for a [`Controller`]
pub struct ControllerBuilder {
    greeting: String,
    capture: Option<Box<dyn CaptureChannel>>,
    dispatch: Option<Box<dyn DispatchChannel>>,
    playback: Option<Box<dyn PlaybackChannel>>,
    waker: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            capture: None,
            dispatch: None,
            playback: None,
            waker: None,
        }
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn with_capture(mut self, capture: impl CaptureChannel + 'static) -> Self {
        self.capture = Some(Box::new(capture));
        self
    }

    pub fn with_boxed_capture(mut self, capture: Box<dyn CaptureChannel>) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn with_dispatch(mut self, dispatch: impl DispatchChannel + 'static) -> Self {
        self.dispatch = Some(Box::new(dispatch));
        self
    }

    pub fn with_playback(mut self, playback: impl PlaybackChannel + 'static) -> Self {
        self.playback = Some(Box::new(playback));
        self
    }

    pub fn with_boxed_playback(mut self, playback: Box<dyn PlaybackChannel>) -> Self {
        self.playback = Some(playback);
        self
    }

    /// Called after each posted event, e.g. to request a repaint
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Box::new(waker));
        self
    }

    pub fn build<V: Presenter>(self, presenter: V) -> Result<Controller<V>> {
        let dispatch = self
            .dispatch
            .ok_or_else(|| VoicebotError::ConfigError("no dispatch channel configured".into()))?;
        let capture = self
            .capture
            .unwrap_or_else(|| Box::new(UnavailableCapture));
        let playback = self.playback.unwrap_or_else(|| Box::new(SilentPlayback));
        let capture_available = capture.is_available();

        let (mut events, event_rx) = event_channel();
        if let Some(waker) = self.waker {
            events = events.with_waker(waker);
        }

        let log = MessageLog::seeded(Message::bot(self.greeting));

        let mut controller = Controller {
            state: InteractionState::Idle,
            processing: false,
            capture_session: false,
            utterance: None,
            log,
            capture,
            capture_available,
            dispatch,
            playback,
            presenter,
            events,
            event_rx,
        };

        let seed = controller.log.seed();
        controller.presenter.message_appended(&seed);
        if !capture_available {
            info!("Speech capture unavailable, text input only");
            controller.append(Message::bot(CAPTURE_UNAVAILABLE_NOTICE));
        }
        if !controller.playback.is_available() {
            info!("Speech playback unavailable, replies shown as text only");
        }

        let surface = controller.surface();
        controller.presenter.present(&surface);
        Ok(controller)
    }
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
