//! The live connection table.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use fanout_engine::EventSink;
use realtime_wire::ServerEvent;
use tracker_core::ConnectionId;

/// Outbound frames buffered per connection before events get dropped.
pub const OUTBOUND_BUFFER: usize = 64;

/// Maps live connections to their outbound channels.
///
/// This is the delivery side of the gateway: the fan-out engine resolves
/// recipients and calls [`EventSink::deliver`]; the table serializes the
/// event and hands it to the connection's writer task without blocking.
/// A full buffer or a closing connection drops the event, never the
/// caller.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTable {
    inner: Arc<RwLock<HashMap<ConnectionId, mpsc::Sender<Message>>>>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, connection: ConnectionId, sender: mpsc::Sender<Message>) {
        self.inner
            .write()
            .expect("lock poisoned")
            .insert(connection, sender);
    }

    /// Drops the connection's sender, which ends its writer task.
    pub fn remove(&self, connection: &ConnectionId) {
        self.inner.write().expect("lock poisoned").remove(connection);
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").is_empty()
    }
}

impl EventSink for ConnectionTable {
    fn deliver(&self, connection: &ConnectionId, event: &ServerEvent) {
        let sender = {
            let inner = self.inner.read().expect("lock poisoned");
            match inner.get(connection) {
                Some(sender) => sender.clone(),
                None => return,
            }
        };

        let json = match event.to_json() {
            Ok(json) => json,
            Err(err) => {
                warn!(connection_id = %connection, error = %err, "event serialization failed");
                return;
            }
        };

        match sender.try_send(Message::Text(json.into())) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(
                    connection_id = %connection,
                    kind = event.kind(),
                    "outbound buffer full, event dropped"
                );
            }
            Err(TrySendError::Closed(_)) => {
                debug!(connection_id = %connection, "connection closing, event dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realtime_wire::NotificationCategory;

    fn event() -> ServerEvent {
        ServerEvent::notification("hello".to_string(), NotificationCategory::TaskAssigned)
    }

    #[tokio::test]
    async fn delivers_to_known_connection() {
        let table = ConnectionTable::new();
        let connection = ConnectionId::new();
        let (tx, mut rx) = mpsc::channel(4);
        table.insert(connection.clone(), tx);

        table.deliver(&connection, &event());

        let message = rx.recv().await.expect("message delivered");
        match message {
            Message::Text(text) => {
                let parsed = ServerEvent::from_json(&text).unwrap();
                assert_eq!(parsed.kind(), "notification");
            }
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_connection_is_a_noop() {
        let table = ConnectionTable::new();
        table.deliver(&ConnectionId::new(), &event());
    }

    #[tokio::test]
    async fn full_buffer_drops_instead_of_blocking() {
        let table = ConnectionTable::new();
        let connection = ConnectionId::new();
        let (tx, mut rx) = mpsc::channel(1);
        table.insert(connection.clone(), tx);

        table.deliver(&connection, &event());
        table.deliver(&connection, &event());

        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err(), "second event was dropped");
    }

    #[tokio::test]
    async fn closed_receiver_is_tolerated() {
        let table = ConnectionTable::new();
        let connection = ConnectionId::new();
        let (tx, rx) = mpsc::channel(1);
        table.insert(connection.clone(), tx);
        drop(rx);

        table.deliver(&connection, &event());
    }

    #[tokio::test]
    async fn remove_ends_delivery() {
        let table = ConnectionTable::new();
        let connection = ConnectionId::new();
        let (tx, mut rx) = mpsc::channel(4);
        table.insert(connection.clone(), tx);
        assert_eq!(table.len(), 1);

        table.remove(&connection);
        assert!(table.is_empty());
        table.deliver(&connection, &event());
        assert!(rx.try_recv().is_err());
    }
}
