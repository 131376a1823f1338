use std::sync::Mutex;

use realtime_wire::ServerEvent;
use tracker_core::ConnectionId;

/// Outbound delivery surface for the fan-out engine.
///
/// The engine never talks to sockets directly. It resolves recipients,
/// then hands each (connection, event) pair to the sink. Delivery is
/// fire-and-forget: a sink must not block and must not report failures
/// back into the mutation path.
pub trait EventSink: Send + Sync {
    /// Deliver an event to a single connection.
    fn deliver(&self, connection: &ConnectionId, event: &ServerEvent);
}

/// A sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn deliver(&self, _connection: &ConnectionId, _event: &ServerEvent) {}
}

/// A sink that records deliveries for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    deliveries: Mutex<Vec<(ConnectionId, ServerEvent)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All deliveries in dispatch order.
    pub fn deliveries(&self) -> Vec<(ConnectionId, ServerEvent)> {
        self.deliveries.lock().expect("lock poisoned").clone()
    }

    /// Events delivered to one connection, in dispatch order.
    pub fn events_for(&self, connection: &ConnectionId) -> Vec<ServerEvent> {
        self.deliveries
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|(target, _)| target == connection)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.deliveries.lock().expect("lock poisoned").clear();
    }

    pub fn len(&self) -> usize {
        self.deliveries.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.lock().expect("lock poisoned").is_empty()
    }
}

impl EventSink for RecordingSink {
    fn deliver(&self, connection: &ConnectionId, event: &ServerEvent) {
        self.deliveries
            .lock()
            .expect("lock poisoned")
            .push((connection.clone(), event.clone()));
    }
}
