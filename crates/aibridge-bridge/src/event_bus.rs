//! Fan-out of classifier notifications to app-side listeners
//!
//! Listeners that fall more than [`EventBus::DEFAULT_CAPACITY`] events behind
//! see `RecvError::Lagged` and resume from the oldest retained event.

use crate::classifier::ClassifierEvent;
use tokio::sync::broadcast;

#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<ClassifierEvent>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Listen for events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ClassifierEvent> {
        self.sender.subscribe()
    }

    /// Deliver to every current listener. A component with no listeners drops
    /// the event.
    pub fn publish(&self, event: ClassifierEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("classifier event dropped, no listeners");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}
