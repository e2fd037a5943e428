//! Connection handles passed to listeners.
//!
//! DESIGN
//! ======
//! Listeners never touch the socket. They receive an `Arc<dyn Connection>`
//! and call `send`, which enqueues onto the connection's bounded outbound
//! channel; the websocket loop in `routes::ws` drains it. Sending is
//! fire-and-forget from the listener's point of view: no retry, and the
//! cancellation token is the only way to abandon a send blocked on a full
//! queue.

use async_trait::async_trait;
use frames::TransportMessage;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SendError {
    #[error("connection closed")]
    Closed,
    #[error("send cancelled")]
    Cancelled,
}

/// A live client connection as seen by listeners.
#[async_trait]
pub trait Connection: Send + Sync {
    fn id(&self) -> Uuid;

    /// Queue `message` for delivery to this client.
    async fn send(&self, message: TransportMessage, cancel: CancellationToken) -> Result<(), SendError>;
}

/// Websocket-backed connection handle.
#[derive(Clone)]
pub struct WsConnection {
    id: Uuid,
    tx: mpsc::Sender<TransportMessage>,
}

impl WsConnection {
    #[must_use]
    pub fn new(id: Uuid, tx: mpsc::Sender<TransportMessage>) -> Self {
        Self { id, tx }
    }
}

#[async_trait]
impl Connection for WsConnection {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn send(&self, message: TransportMessage, cancel: CancellationToken) -> Result<(), SendError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(SendError::Cancelled),
            result = self.tx.send(message) => result.map_err(|_| SendError::Closed),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use std::sync::Mutex;

    /// Connection that records every message instead of writing a socket.
    pub struct RecordingConnection {
        id: Uuid,
        closed: bool,
        sent: Mutex<Vec<TransportMessage>>,
    }

    impl RecordingConnection {
        #[must_use]
        pub fn new() -> Self {
            Self { id: Uuid::new_v4(), closed: false, sent: Mutex::new(Vec::new()) }
        }

        /// A connection whose peer has already gone away.
        #[must_use]
        pub fn closed() -> Self {
            Self { closed: true, ..Self::new() }
        }

        pub fn sent(&self) -> Vec<TransportMessage> {
            self.sent.lock().expect("recording mutex should lock").clone()
        }
    }

    #[async_trait]
    impl Connection for RecordingConnection {
        fn id(&self) -> Uuid {
            self.id
        }

        async fn send(&self, message: TransportMessage, cancel: CancellationToken) -> Result<(), SendError> {
            if cancel.is_cancelled() {
                return Err(SendError::Cancelled);
            }
            if self.closed {
                return Err(SendError::Closed);
            }
            self.sent.lock().expect("recording mutex should lock").push(message);
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
