//! Thread-safe event collector for notification assertions in tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::ExchangeId;
use crate::service::{Event, Notifier};

/// Records every event it receives.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, in arrival order.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Count `ExchangeConnected` events for a venue.
    pub fn connected_count(&self, exchange: &ExchangeId) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| {
                matches!(event, Event::ExchangeConnected { exchange: e } if e == exchange)
            })
            .count()
    }

    /// Count profitable-opportunity events.
    pub fn opportunity_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, Event::OpportunityDetected(_)))
            .count()
    }

    /// Count health-status events.
    pub fn health_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, Event::HealthStatus(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}
