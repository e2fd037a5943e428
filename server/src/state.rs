//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the registered listeners and the set of open websocket
//! connections. Listeners are registered once at start-up; connections come
//! and go with each upgrade.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::connection::{Connection, WsConnection};
use crate::listener::WebSocketListener;
use crate::ping::PingListener;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// Listeners that see every inbound message, in registration order.
    pub listeners: Arc<Vec<Arc<dyn WebSocketListener>>>,
    /// Open connections keyed by connection id.
    pub connections: Arc<RwLock<HashMap<Uuid, WsConnection>>>,
    /// Capacity of each connection's outbound queue.
    pub ws_outbound_buffer: usize,
}

impl AppState {
    #[must_use]
    pub fn new(listeners: Vec<Arc<dyn WebSocketListener>>, ws_outbound_buffer: usize) -> Self {
        Self {
            listeners: Arc::new(listeners),
            connections: Arc::new(RwLock::new(HashMap::new())),
            ws_outbound_buffer,
        }
    }

    /// State with the ping listener registered.
    #[must_use]
    pub fn with_default_listeners(ws_outbound_buffer: usize) -> Self {
        Self::new(vec![Arc::new(PingListener::new())], ws_outbound_buffer)
    }

    #[must_use]
    pub fn listener_names(&self) -> Vec<String> {
        self.listeners.iter().map(|l| l.name().to_owned()).collect()
    }

    pub async fn register_connection(&self, connection: WsConnection) {
        self.connections.write().await.insert(connection.id(), connection);
    }

    pub async fn remove_connection(&self, id: Uuid) -> bool {
        self.connections.write().await.remove(&id).is_some()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
