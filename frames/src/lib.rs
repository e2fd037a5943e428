//! Shared envelope model and JSON codec for the ping/pong socket channel.
//!
//! This crate owns the wire representation used by both `server` and `cli`.
//! Two layers travel on every websocket text frame:
//!
//! - [`TransportMessage`]: the host framing, `{ "MessageType", "Data" }`,
//!   where `Data` is the *stringified* inner envelope.
//! - [`Envelope`]: the inner payload, `{ "Type", "UserId", "Payload" }`.
//!
//! Field names are PascalCase on the wire to match the host's serializer.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Logical channel of the ping listener. Tags outgoing replies and filters
/// inbound messages on the client.
pub const CHANNEL_NAME: &str = "WebSocket";

/// Envelope type sent by the client.
pub const PING: &str = "ping";

/// Envelope type sent back by the server.
pub const PONG: &str = "pong";

/// Literal placed before the server clock in a pong payload.
pub const PONG_PREFIX: &str = "Server time: ";

/// Fixed payload the client attaches to every ping.
pub const GREETING: &str = "Hello from dashboard";

/// Error returned by the encode/decode helpers.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not JSON, or does not match the expected shape.
    #[error("failed to decode message: {0}")]
    Decode(#[source] serde_json::Error),
    /// The value could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Inner message exchanged between the client driver and the dispatcher.
///
/// Every field is optional on decode; a missing `Type` is valid input that
/// no handler acts on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl Envelope {
    /// Build a ping carrying `user_id` and `payload`.
    pub fn ping(user_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self { r#type: Some(PING.to_owned()), user_id: Some(user_id.into()), payload: Some(payload.into()) }
    }

    /// Build a pong addressed to `user_id` (echoed as-is, absent stays absent).
    pub fn pong(user_id: Option<String>, payload: impl Into<String>) -> Self {
        Self { r#type: Some(PONG.to_owned()), user_id, payload: Some(payload.into()) }
    }

    /// Discriminator, or `""` when absent.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.r#type.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn is_ping(&self) -> bool {
        self.kind() == PING
    }
}

/// Decode an inner envelope from JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for non-JSON text and for JSON that does not
/// describe an object with string-or-null fields.
pub fn decode_envelope(text: &str) -> Result<Envelope, CodecError> {
    serde_json::from_str(text).map_err(CodecError::Decode)
}

/// Encode an inner envelope as compact JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode_envelope(envelope: &Envelope) -> Result<String, CodecError> {
    serde_json::to_string(envelope).map_err(CodecError::Encode)
}

// =============================================================================
// TRANSPORT MESSAGE
// =============================================================================

/// Host framing around an envelope. `data` holds the envelope as JSON text,
/// not as a nested object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransportMessage {
    pub message_type: String,
    #[serde(default)]
    pub data: String,
}

impl TransportMessage {
    pub fn new(message_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self { message_type: message_type.into(), data: data.into() }
    }

    /// Wrap an envelope for `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the envelope cannot be serialized.
    pub fn wrap(channel: impl Into<String>, envelope: &Envelope) -> Result<Self, CodecError> {
        Ok(Self::new(channel, encode_envelope(envelope)?))
    }

    #[must_use]
    pub fn is_channel(&self, channel: &str) -> bool {
        self.message_type == channel
    }
}

/// Decode the outer framing from a websocket text frame.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] when the frame is not a transport message.
pub fn decode_transport(text: &str) -> Result<TransportMessage, CodecError> {
    serde_json::from_str(text).map_err(CodecError::Decode)
}

/// Encode the outer framing for a websocket text frame.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode_transport(message: &TransportMessage) -> Result<String, CodecError> {
    serde_json::to_string(message).map_err(CodecError::Encode)
}

// =============================================================================
// CLOCK
// =============================================================================

/// Format a wall-clock instant as `HH:MM:SS`.
#[must_use]
pub fn clock_text(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}:{:02}", at.hour(), at.minute(), at.second())
}

/// Pong payload for the given server instant, e.g. `Server time: 09:05:00`.
#[must_use]
pub fn server_time_payload(at: OffsetDateTime) -> String {
    format!("{PONG_PREFIX}{}", clock_text(at))
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
