//! Fan-out of engine events to any number of subscribers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use super::types::{EventKind, PlayerEvent};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    kinds: Vec<EventKind>,
    tx: Sender<PlayerEvent>,
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Cloneable handle; clones share the same subscriber list.
///
/// Each emitted event is sent once to every subscriber interested in its
/// kind. Subscribers whose receiver was dropped are removed on the next
/// emit.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Arc<Mutex<HubState>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kinds: &[EventKind]) -> (SubscriptionId, Receiver<PlayerEvent>) {
        let (tx, rx) = mpsc::channel();
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscribers.push(Subscriber {
            id,
            kinds: kinds.to_vec(),
            tx,
        });
        (id, rx)
    }

    pub fn subscribe_all(&self) -> (SubscriptionId, Receiver<PlayerEvent>) {
        self.subscribe(&EventKind::ALL)
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let before = state.subscribers.len();
        state.subscribers.retain(|s| s.id != id);
        state.subscribers.len() != before
    }

    pub fn emit(&self, event: PlayerEvent) {
        let kind = event.kind();
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state
            .subscribers
            .retain(|s| !s.kinds.contains(&kind) || s.tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .map(|s| s.subscribers.len())
            .unwrap_or(0)
    }
}
