//! Interaction state and the presentation record derived from it

use crate::messages::Message;

/// The single interaction state owned by the controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
    /// Waiting for the user
    #[default]
    Idle,
    /// Capture channel is active
    Listening,
    /// A query is in flight
    Processing,
    /// A reply is being vocalized
    Speaking,
    /// Transient, display-only failure state
    Error,
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn is_listening(&self) -> bool {
        matches!(self, InteractionState::Listening)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, InteractionState::Processing)
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self, InteractionState::Speaking)
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            InteractionState::Idle => "Ready",
            InteractionState::Listening => "Listening...",
            InteractionState::Processing => "Processing...",
            InteractionState::Speaking => "Speaking...",
            InteractionState::Error => "Error occurred",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            InteractionState::Idle => StatusTone::Success,
            InteractionState::Listening => StatusTone::Warning,
            InteractionState::Processing | InteractionState::Speaking => StatusTone::Info,
            InteractionState::Error => StatusTone::Danger,
        }
    }
}

impl std::fmt::Display for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionState::Idle => write!(f, "Idle"),
            InteractionState::Listening => write!(f, "Listening"),
            InteractionState::Processing => write!(f, "Processing"),
            InteractionState::Speaking => write!(f, "Speaking"),
            InteractionState::Error => write!(f, "Error"),
        }
    }
}

/// Color class of the status indicator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Warning,
    Info,
    Danger,
}

/// Everything the presentation layer shows for one interaction state.
///
/// Always derived from the state, never stored beside it, so the status
/// indicator, capture buttons and loading overlay cannot drift apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    pub state: InteractionState,
    pub status: &'static str,
    pub tone: StatusTone,
    pub capture_start_enabled: bool,
    pub capture_stop_enabled: bool,
    pub loading: bool,
}

impl Surface {
    pub fn for_state(state: InteractionState, capture_available: bool) -> Self {
        Self {
            state,
            status: state.status_text(),
            tone: state.tone(),
            capture_start_enabled: capture_available && state.is_idle(),
            capture_stop_enabled: capture_available && state.is_listening(),
            loading: state.is_processing(),
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::for_state(InteractionState::Idle, false)
    }
}

/// Sink for the controller's observable effects
pub trait Presenter {
    /// Called after every state transition
    fn present(&mut self, surface: &Surface);

    fn message_appended(&mut self, _message: &Message) {}

    fn log_cleared(&mut self, _seed: &Message) {}
}
