//! Ping listener — answers `ping` envelopes with the server clock.
//!
//! DESIGN
//! ======
//! Stateless: one decode, one branch, at most one reply per message. Messages
//! tagged with another channel are left to their own listeners. Any
//! `Type` other than `ping` is dropped without a reply or a log line; only
//! undecodable payloads are reported. Replies are never deduplicated, so two
//! identical pings get two pongs.

use async_trait::async_trait;
use frames::{Envelope, TransportMessage};
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::connection::Connection;
use crate::listener::{MessageInfo, Outcome, WebSocketListener};

pub struct PingListener {
    name: String,
}

impl PingListener {
    #[must_use]
    pub fn new() -> Self {
        Self { name: frames::CHANNEL_NAME.to_owned() }
    }

    /// Decode `raw` and answer it on `connection` if it is a ping.
    pub async fn handle(&self, raw: &str, connection: &dyn Connection) -> Outcome {
        self.handle_cancellable(raw, connection, CancellationToken::new())
            .await
    }

    /// Like [`PingListener::handle`], with a caller-owned token that can abandon
    /// a reply stuck on a full outbound queue.
    pub async fn handle_cancellable(&self, raw: &str, connection: &dyn Connection, cancel: CancellationToken) -> Outcome {
        self.handle_at(raw, connection, cancel, OffsetDateTime::now_utc())
            .await
    }

    pub(crate) async fn handle_at(
        &self,
        raw: &str,
        connection: &dyn Connection,
        cancel: CancellationToken,
        now: OffsetDateTime,
    ) -> Outcome {
        info!(connection_id = %connection.id(), raw, "ping: incoming raw");

        let envelope = match frames::decode_envelope(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(connection_id = %connection.id(), error = %e, "ping: failed to parse envelope");
                return Outcome::Rejected;
            }
        };

        if !envelope.is_ping() {
            return Outcome::Ignored;
        }

        let user_id = envelope.user_id;
        info!(user_id = user_id.as_deref().unwrap_or_default(), "ping: got ping");

        let reply = Envelope::pong(user_id, frames::server_time_payload(now));
        let message = match TransportMessage::wrap(&self.name, &reply) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "ping: failed to encode pong");
                return Outcome::Undelivered;
            }
        };

        match connection.send(message, cancel).await {
            Ok(()) => {
                info!(connection_id = %connection.id(), "ping: sent pong");
                Outcome::Replied
            }
            Err(e) => {
                warn!(connection_id = %connection.id(), error = %e, "ping: pong not delivered");
                Outcome::Undelivered
            }
        }
    }
}

impl Default for PingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebSocketListener for PingListener {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process_message(&self, message: MessageInfo) -> Outcome {
        if message.message_type != self.name {
            return Outcome::Ignored;
        }
        self.handle(&message.data, message.connection.as_ref()).await
    }
}

#[cfg(test)]
#[path = "ping_test.rs"]
mod tests;
