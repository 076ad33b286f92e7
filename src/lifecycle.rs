//! Visibility notifications from the hosting window
//!
//! Components subscribe explicitly and stay registered for as long as they
//! hold the returned [`Subscription`].

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

type Listener = Arc<dyn Fn(Visibility) + Send + Sync>;

#[derive(Default)]
struct Registry {
    visibility: Visibility,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Registry of visibility listeners. Clones share the same registry.
#[derive(Clone, Default)]
pub struct LifecycleHooks {
    inner: Arc<Mutex<Registry>>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(Visibility) + Send + Sync + 'static) -> Subscription {
        let mut registry = self.inner.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Publish the current visibility; listeners run only when it changed
    pub fn notify(&self, visibility: Visibility) {
        let listeners: Vec<Listener> = {
            let mut registry = self.inner.lock();
            if registry.visibility == visibility {
                return;
            }
            registry.visibility = visibility;
            registry.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        debug!("Visibility changed to {:?}", visibility);
        for listener in listeners {
            listener(visibility);
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.inner.lock().visibility
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }
}

/// Keeps a listener registered; dropping it unregisters
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
