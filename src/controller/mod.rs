pub mod events;
pub mod machine;
pub mod state;

pub use events::{event_channel, CaptureEvent, ControllerEvent, EventSender, PlaybackEvent, UtteranceId};
pub use machine::{Controller, ControllerBuilder, CAPTURE_UNAVAILABLE_NOTICE, DEFAULT_GREETING};
pub use state::{InteractionState, Presenter, StatusTone, Surface};
