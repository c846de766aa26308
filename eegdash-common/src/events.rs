//! Client event bus
//!
//! Session transitions are published here so independent views (the CLI
//! prompt, the dashboard poller) react without holding references to each
//! other. The request gateway uses it to ask the front end to show the login
//! view after a 401.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Client-side events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Backend rejected the credential; credential state is already cleared
    /// and the front end must navigate to its login view.
    LoginRequired {
        /// Request path that received the 401
        path: String,
        timestamp: DateTime<Utc>,
    },

    /// A user logged in or a persisted session was restored
    SessionStarted {
        username: String,
        timestamp: DateTime<Utc>,
    },

    /// The user logged out explicitly
    SessionEnded { timestamp: DateTime<Utc> },
}

impl ClientEvent {
    pub fn login_required(path: impl Into<String>) -> Self {
        ClientEvent::LoginRequired {
            path: path.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn session_started(username: impl Into<String>) -> Self {
        ClientEvent::SessionStarted {
            username: username.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn session_ended() -> Self {
        ClientEvent::SessionEnded {
            timestamp: Utc::now(),
        }
    }
}

/// Broadcast bus for [`ClientEvent`]
///
/// Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ClientEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    ///
    /// # Examples
    ///
    /// ```
    /// use eegdash_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(16);
    /// assert_eq!(event_bus.capacity(), 16);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, returning the number of subscribers reached
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ClientEvent,
    ) -> Result<usize, broadcast::error::SendError<ClientEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit(ClientEvent::login_required("/dashboard")).unwrap();

        match rx.recv().await.unwrap() {
            ClientEvent::LoginRequired { path, .. } => assert_eq!(path, "/dashboard"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(8);
        assert!(bus.emit(ClientEvent::session_ended()).is_err());
        // Lossy variant never fails
        bus.emit_lossy(ClientEvent::session_ended());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_value(ClientEvent::session_started("dr_lee")).unwrap();
        assert_eq!(json["type"], "SessionStarted");
        assert_eq!(json["username"], "dr_lee");
    }
}
