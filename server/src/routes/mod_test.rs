use super::*;
use axum::extract::State;

#[tokio::test]
async fn healthz_returns_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}

#[tokio::test]
async fn plugin_info_reports_identity_and_listeners() {
    let state = AppState::with_default_listeners(8);
    let info = plugin::plugin_info(State(state)).await.0;

    assert_eq!(info.name, "Web Socket Demo");
    assert_eq!(info.id.to_string(), "a2e23e55-6e17-4ccd-b406-6b948c136b35");
    assert_eq!(info.listeners, vec!["WebSocket".to_owned()]);
    assert_eq!(info.connections, 0);
}

#[test]
fn plugin_info_serializes_pascal_case() {
    let info = plugin::PluginInfo {
        name: plugin::PLUGIN_NAME,
        id: plugin::PLUGIN_ID,
        listeners: vec!["WebSocket".into()],
        connections: 2,
    };
    let value = serde_json::to_value(&info).expect("serialize");
    assert_eq!(value["Name"], "Web Socket Demo");
    assert_eq!(value["Listeners"][0], "WebSocket");
    assert_eq!(value["Connections"], 2);
    assert!(value.get("Id").is_some());
}
