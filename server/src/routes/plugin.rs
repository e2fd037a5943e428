//! Plugin identity endpoint.
//!
//! Reports the identity the host shows for this plugin, plus the listeners it
//! registered and how many sockets are currently open.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use uuid::{Uuid, uuid};

use crate::state::AppState;

pub const PLUGIN_NAME: &str = "Web Socket Demo";
pub const PLUGIN_ID: Uuid = uuid!("a2e23e55-6e17-4ccd-b406-6b948c136b35");

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginInfo {
    pub name: &'static str,
    pub id: Uuid,
    pub listeners: Vec<String>,
    pub connections: usize,
}

pub async fn plugin_info(State(state): State<AppState>) -> Json<PluginInfo> {
    Json(PluginInfo {
        name: PLUGIN_NAME,
        id: PLUGIN_ID,
        listeners: state.listener_names(),
        connections: state.connection_count().await,
    })
}
