//! WebSocket handler — host side of the listener contract.
//!
//! DESIGN
//! ======
//! On upgrade, assigns a connection ID, registers a `WsConnection` handle,
//! and splits the socket:
//! - A writer task drains the connection's outbound queue onto the socket.
//! - The read loop decodes each text frame as a `TransportMessage` and hands
//!   it to every registered listener, one message at a time.
//!
//! Listeners reply through the handle, never through the socket, so a slow
//! client only ever blocks its own read loop.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register connection
//! 2. Text frames → decode framing → every listener → `Outcome`
//! 3. Close or transport error → unregister → writer drains and exits

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use frames::TransportMessage;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::connection::{Connection, WsConnection};
use crate::listener::{MessageInfo, Outcome};
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    let (conn_tx, mut conn_rx) = mpsc::channel::<TransportMessage>(state.ws_outbound_buffer);
    let connection = WsConnection::new(connection_id, conn_tx);
    state.register_connection(connection.clone()).await;
    let handle: Arc<dyn Connection> = Arc::new(connection);

    info!(%connection_id, "ws: client connected");

    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(message) = conn_rx.recv().await {
            let Some(text) = encode_outbound(&message) else { continue };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(msg) = stream.next().await {
        let Ok(msg) = msg else { break };
        match msg {
            Message::Text(text) => {
                process_inbound_text(&state, &handle, text.as_str()).await;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Drop every sender so the writer sees end-of-queue and exits.
    state.remove_connection(connection_id).await;
    drop(handle);
    let _ = writer.await;

    info!(%connection_id, "ws: client disconnected");
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Decode one inbound text frame and deliver it to every listener.
///
/// Kept apart from the socket so tests can drive dispatch with a recording
/// connection. Returns one outcome per listener; empty when the frame is not
/// a transport message.
async fn process_inbound_text(state: &AppState, connection: &Arc<dyn Connection>, text: &str) -> Vec<Outcome> {
    let message = match frames::decode_transport(text) {
        Ok(m) => m,
        Err(e) => {
            warn!(connection_id = %connection.id(), error = %e, "ws: invalid inbound frame");
            return Vec::new();
        }
    };

    debug!(connection_id = %connection.id(), message_type = %message.message_type, "ws: recv message");

    let mut outcomes = Vec::with_capacity(state.listeners.len());
    for listener in state.listeners.iter() {
        let info = MessageInfo {
            message_type: message.message_type.clone(),
            data: message.data.clone(),
            connection: Arc::clone(connection),
        };
        let outcome = listener.process_message(info).await;
        debug!(listener = listener.name(), ?outcome, "ws: listener done");
        outcomes.push(outcome);
    }
    outcomes
}

// =============================================================================
// HELPERS
// =============================================================================

fn encode_outbound(message: &TransportMessage) -> Option<String> {
    match frames::encode_transport(message) {
        Ok(text) => {
            debug!(message_type = %message.message_type, "ws: send message");
            Some(text)
        }
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize message");
            None
        }
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
