//! Playback channel boundary and voice settings

use crate::controller::{EventSender, UtteranceId};
use serde::{Deserialize, Serialize};

/// Voice applied to every utterance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            rate: 0.9,
            pitch: 1.0,
            volume: 0.8,
        }
    }
}

/// Text-to-speech output.
///
/// `speak` supersedes whatever is playing. Started/Ended events carry the
/// returned id; `None` means nothing will be spoken and no events follow.
pub trait PlaybackChannel {
    fn is_available(&self) -> bool;

    fn speak(&mut self, text: &str, events: &EventSender) -> Option<UtteranceId>;

    fn cancel(&mut self);
}

/// Null playback: replies are shown but never spoken
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayback;

impl PlaybackChannel for SilentPlayback {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _text: &str, _events: &EventSender) -> Option<UtteranceId> {
        None
    }

    fn cancel(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::event_channel;

    #[test]
    fn test_default_voice() {
        let voice = VoiceSettings::default();
        assert_eq!(voice.locale, "en-US");
        assert_eq!(voice.rate, 0.9);
        assert_eq!(voice.pitch, 1.0);
        assert_eq!(voice.volume, 0.8);
    }

    #[test]
    fn test_silent_playback_speaks_nothing() {
        let (tx, rx) = event_channel();
        let mut playback = SilentPlayback;
        assert!(!playback.is_available());
        assert_eq!(playback.speak("hello", &tx), None);
        assert!(rx.try_recv().is_err());
    }
}
