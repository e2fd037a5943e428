//! Client driver — the dashboard side of the ping channel.
//!
//! DESIGN
//! ======
//! A transport-free state machine. The binary feeds it view lifecycle
//! events, clicks, and decoded inbound messages; the driver appends
//! human-readable lines to its log and hands back whatever should be sent.
//!
//! ```text
//! Unattached --view_shown--> Attached --view_destroyed--> Unattached
//! ```
//!
//! Inbound messages are only seen while attached. Replies are not correlated
//! to pings: a reader of the log matches them by content.

use frames::{CHANNEL_NAME, Envelope, GREETING, TransportMessage};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unattached,
    Attached,
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("view is not shown")]
    NotAttached,
    #[error(transparent)]
    Codec(#[from] frames::CodecError),
}

pub struct ClientDriver {
    state: ViewState,
    user_id: Option<String>,
    log: Vec<String>,
    /// Index of the first log line not yet returned by `unread`.
    read_upto: usize,
    clock: fn() -> OffsetDateTime,
}

impl ClientDriver {
    /// Driver for the given user; `None` pings with an empty user id.
    #[must_use]
    pub fn new(user_id: Option<String>) -> Self {
        Self::with_clock(user_id, OffsetDateTime::now_utc)
    }

    #[must_use]
    pub fn with_clock(user_id: Option<String>, clock: fn() -> OffsetDateTime) -> Self {
        Self { state: ViewState::Unattached, user_id, log: Vec::new(), read_upto: 0, clock }
    }

    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Every line logged so far.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Lines logged since the previous call.
    pub fn unread(&mut self) -> &[String] {
        let start = self.read_upto;
        self.read_upto = self.log.len();
        &self.log[start..]
    }

    pub fn on_view_shown(&mut self) {
        self.state = ViewState::Attached;
        self.push("WebSocketTest loaded, ready.");
    }

    /// Build the ping for one button press.
    ///
    /// # Errors
    ///
    /// [`DriverError::NotAttached`] before the view is shown or after it is
    /// destroyed; [`DriverError::Codec`] if the envelope cannot be encoded.
    pub fn on_click(&mut self) -> Result<TransportMessage, DriverError> {
        if self.state != ViewState::Attached {
            return Err(DriverError::NotAttached);
        }
        self.push("Sending ping -> WebSocket...");

        let envelope = Envelope::ping(self.user_id.clone().unwrap_or_default(), GREETING);
        Ok(TransportMessage::wrap(CHANNEL_NAME, &envelope)?)
    }

    /// Render one inbound message. Returns `true` when it was on this
    /// channel and produced a log line.
    pub fn on_message(&mut self, message: &TransportMessage) -> bool {
        if self.state != ViewState::Attached || !message.is_channel(CHANNEL_NAME) {
            return false;
        }

        let data = if message.data.is_empty() { "{}" } else { message.data.as_str() };
        let line = match serde_json::from_str::<serde_json::Value>(data) {
            Ok(value) => format!("Response: {value}"),
            Err(_) => format!("Raw: {}", message.data),
        };
        self.push(&line);
        true
    }

    pub fn on_view_destroyed(&mut self) {
        self.state = ViewState::Unattached;
    }

    fn push(&mut self, message: &str) {
        let ts = frames::clock_text((self.clock)());
        self.log.push(format!("[{ts}] {message}"));
    }
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod tests;
