//! Listener seam between the websocket host and message handlers.
//!
//! DESIGN
//! ======
//! The host decodes the outer transport framing and hands every message to
//! every registered listener; each listener decides for itself whether the
//! message concerns it. Handlers return an `Outcome` describing what they
//! did. The host only logs it, so handlers stay testable without a socket.

use std::sync::Arc;

use async_trait::async_trait;

use crate::connection::Connection;

/// One inbound message as delivered to a listener.
#[derive(Clone)]
pub struct MessageInfo {
    /// Channel tag from the outer framing.
    pub message_type: String,
    /// Stringified inner payload.
    pub data: String,
    /// Connection the message arrived on. Replies go back through it.
    pub connection: Arc<dyn Connection>,
}

/// What a listener did with one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exactly one reply was handed to the connection.
    Replied,
    /// Valid input that this listener does not act on.
    Ignored,
    /// Payload could not be decoded. Logged and dropped.
    Rejected,
    /// A reply was built but the connection refused it.
    Undelivered,
}

#[async_trait]
pub trait WebSocketListener: Send + Sync {
    /// Logical channel name; tags every reply this listener sends.
    fn name(&self) -> &str;

    async fn process_message(&self, message: MessageInfo) -> Outcome;
}
