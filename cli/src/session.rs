//! Ping session — drives a [`ClientDriver`] over an open websocket.
//!
//! The session presses the button `count` times and renders replies until
//! one has arrived for every press. The idle timeout only runs while a
//! reply is outstanding, so a long interval between presses never counts
//! against it.

use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::driver::{ClientDriver, DriverError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("websocket error: {0}")]
    Ws(Box<WsError>),
    #[error("websocket closed")]
    WsClosed,
    #[error("timed out waiting for {missing} pong(s)")]
    Timeout { missing: usize },
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl From<WsError> for SessionError {
    fn from(error: WsError) -> Self {
        Self::Ws(Box::new(error))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingPlan {
    /// Number of button presses.
    pub count: usize,
    /// Delay between presses; the first press is immediate.
    pub interval: Duration,
    /// Give up when a reply is outstanding and nothing arrives for this long.
    pub idle: Duration,
}

/// Run `plan` against `stream`, handing every new log line to `emit`.
///
/// # Errors
///
/// [`SessionError::Timeout`] when a reply is outstanding and the stream is
/// idle for `plan.idle`; [`SessionError::WsClosed`] when the server closes
/// first; [`SessionError::Ws`] when sending or receiving fails.
pub async fn run_pings<S>(
    plan: &PingPlan,
    stream: &mut S,
    driver: &mut ClientDriver,
    mut emit: impl FnMut(&str),
) -> Result<(), SessionError>
where
    S: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
{
    let mut ticker = tokio::time::interval(plan.interval.max(Duration::from_millis(1)));
    let mut sent = 0_usize;
    let mut received = 0_usize;

    while sent < plan.count || received < sent {
        tokio::select! {
            _ = ticker.tick(), if sent < plan.count => {
                let message = driver.on_click()?;
                let text = frames::encode_transport(&message).map_err(DriverError::from)?;
                stream.send(Message::Text(text.into())).await?;
                sent += 1;
            }
            next = tokio::time::timeout(plan.idle, stream.next()), if received < sent => {
                let Ok(next) = next else {
                    return Err(SessionError::Timeout { missing: sent - received });
                };
                match next {
                    None | Some(Ok(Message::Close(_))) => return Err(SessionError::WsClosed),
                    Some(Err(error)) => return Err(error.into()),
                    Some(Ok(Message::Text(text))) => match frames::decode_transport(text.as_str()) {
                        Ok(message) => {
                            if driver.on_message(&message) {
                                received += 1;
                            }
                        }
                        Err(error) => tracing::warn!(%error, "ignoring unframed message"),
                    },
                    Some(Ok(_)) => {}
                }
            }
            else => break,
        }
        for line in driver.unread() {
            emit(line);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
