//! Deal lifecycle events and the sink they are published to
use std::sync::Mutex;

/// Success events only. Failed operations surface their error to the caller
/// and publish nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealEvent {
    Created {
        deal_id: String,
        buyer: String,
        seller: String,
        amount: u64,
    },
    Released {
        deal_id: String,
        seller: String,
    },
    Refunded {
        deal_id: String,
        buyer: String,
    },
}

/// Host-supplied notification capability. Publication is fire-and-forget;
/// the service never waits on or checks delivery.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: DealEvent);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: DealEvent) {}
}

/// Buffers events in memory, in publication order. Used by tests and demos
/// to observe what the service emitted.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DealEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DealEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl EventSink for MemorySink {
    fn publish(&self, event: DealEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}
