//! Events posted by the channels back to the controller

use crate::dispatch::DispatchError;
use crate::speech::CaptureError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tracing::debug;

/// Identifies one `speak` call so stale playback notifications can be ignored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

/// Notifications from the capture channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Finalized transcript
    Transcript(String),
    /// Capture failed with a platform error code
    Error(CaptureError),
    /// The platform session is over
    End,
}

/// Notifications from the playback channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started(UtteranceId),
    Ended(UtteranceId),
}

/// Everything the controller reacts to besides direct user actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    Capture(CaptureEvent),
    Dispatch(Result<String, DispatchError>),
    Playback(PlaybackEvent),
}

impl From<CaptureEvent> for ControllerEvent {
    fn from(event: CaptureEvent) -> Self {
        ControllerEvent::Capture(event)
    }
}

impl From<PlaybackEvent> for ControllerEvent {
    fn from(event: PlaybackEvent) -> Self {
        ControllerEvent::Playback(event)
    }
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Cloneable handle the channels use to post events.
///
/// Events are never dropped while the controller is alive; an optional
/// waker is invoked after every post so a UI loop can repaint.
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<ControllerEvent>,
    waker: Option<Waker>,
}

impl EventSender {
    pub fn send(&self, event: impl Into<ControllerEvent>) {
        if let Err(e) = self.tx.send(event.into()) {
            debug!("Controller gone, dropping event: {:?}", e.0);
            return;
        }
        if let Some(waker) = &self.waker {
            waker();
        }
    }

    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }
}

impl std::fmt::Debug for EventSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSender")
            .field("pending", &self.tx.len())
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}

/// Create the controller's event queue
pub fn event_channel() -> (EventSender, Receiver<ControllerEvent>) {
    let (tx, rx) = unbounded();
    (EventSender { tx, waker: None }, rx)
}
