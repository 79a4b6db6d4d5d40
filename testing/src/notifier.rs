//! Notifier that records every published event.

use slotbook_core::notifier::{SlotBooked, SlotNotifier};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

/// Captures published [`SlotBooked`] events for assertions.
///
/// Clones share the same event log.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<SlotBooked>>>,
}

impl RecordingNotifier {
    /// Create a notifier with an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far, in publish order
    #[must_use]
    pub fn events(&self) -> Vec<SlotBooked> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events published so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been published
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SlotNotifier for RecordingNotifier {
    fn publish(&self, event: SlotBooked) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event);
        })
    }
}
