mod config;
mod connection;
mod listener;
mod ping;
mod routes;
mod state;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Missing .env is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");
    let state = state::AppState::with_default_listeners(config.ws_outbound_buffer);

    for name in state.listener_names() {
        tracing::info!(listener = %name, "registered websocket listener");
    }

    let app = routes::app(state);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, plugin = routes::plugin::PLUGIN_NAME, "socket-demo listening");
    axum::serve(listener, app).await.expect("server failed");
}
