//! Gesture event bus.
//!
//! A [`tokio::sync::broadcast`] channel of [`GestureEvent`]s.  Every
//! subscriber receives every event; a slow subscriber lags instead of
//! blocking the engine.

use handwave_types::{GestureEvent, GestureKind, HandwaveError};
use tokio::sync::broadcast;
use tracing::warn;

/// Number of buffered events before old ones are dropped for slow
/// subscribers.
const DEFAULT_CAPACITY: usize = 256;

/// Shared event bus.  Clones share the same channel.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<GestureEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish `event` to every current subscriber.
    ///
    /// Returns the number of receivers handed the event.
    ///
    /// # Errors
    ///
    /// Returns [`HandwaveError::Channel`] when nobody is subscribed.
    pub fn publish(&self, event: GestureEvent) -> Result<usize, HandwaveError> {
        self.sender
            .send(event)
            .map_err(|e| HandwaveError::Channel(format!("no subscribers for {}", e.0.kind)))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GestureEvent> {
        self.sender.subscribe()
    }

    /// Subscribe to a subset of gesture kinds.
    pub fn subscribe_kinds(&self, kinds: impl IntoIterator<Item = GestureKind>) -> GestureSubscriber {
        GestureSubscriber {
            kinds: kinds.into_iter().collect(),
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Receiver that skips events whose kind is not in its filter.
pub struct GestureSubscriber {
    kinds: Vec<GestureKind>,
    receiver: broadcast::Receiver<GestureEvent>,
}

impl GestureSubscriber {
    /// Wait for the next matching event.
    ///
    /// Returns `None` once the bus is closed.
    pub async fn recv(&mut self) -> Option<GestureEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.kinds.contains(&event.kind) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(lagged_by = n, "gesture subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
