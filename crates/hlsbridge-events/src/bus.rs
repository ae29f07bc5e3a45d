use tokio::sync::broadcast;

use crate::Event;

/// Fan-out channel for attach, track and subtitle events.
///
/// The bridge publishes from inside engine callbacks and track list
/// listeners, so publishing never blocks and never fails. With nobody
/// subscribed an event is dropped.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// `capacity` bounds how far a receiver may fall behind. Zero is raised
    /// to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Takes any concern's event, e.g. `AttachEvent::Detached { .. }`.
    pub fn publish<E: Into<Event>>(&self, event: E) {
        let _ = self.tx.send(event.into());
    }

    /// Receiver for events published from now on.
    ///
    /// A receiver more than `capacity` events behind skips to the oldest
    /// retained event and reports `Lagged` once.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
