use super::types::Message;
use parking_lot::RwLock;
use std::sync::Arc;

/// Append-only conversation log that always starts with a seed message.
///
/// Cloning yields another handle onto the same log, so the presentation
/// layer can read while the controller appends.
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl MessageLog {
    pub fn seeded(seed: Message) -> Self {
        Self {
            messages: Arc::new(RwLock::new(vec![seed])),
        }
    }

    pub fn push(&self, message: Message) {
        self.messages.write().push(message);
    }

    pub fn get_all(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    pub fn last(&self) -> Option<Message> {
        self.messages.read().last().cloned()
    }

    /// The message the log was created with
    pub fn seed(&self) -> Message {
        self.messages.read()[0].clone()
    }

    /// Drop everything except the seed message
    pub fn clear_to_seed(&self) {
        self.messages.write().truncate(1);
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    /// A seeded log is never empty; this only exists for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}
