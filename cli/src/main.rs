mod driver;
mod session;

use std::time::Duration;

use clap::Parser;
use tokio_tungstenite::connect_async;
use tracing_subscriber::EnvFilter;

use crate::driver::ClientDriver;
use crate::session::{PingPlan, SessionError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Parser, Debug)]
#[command(name = "socket-demo-cli", about = "Send pings over the demo websocket channel and log replies")]
struct Cli {
    #[arg(long, env = "SOCKET_DEMO_URL", default_value = "ws://127.0.0.1:3000/socket")]
    url: String,

    /// User id placed in each ping; empty when unset.
    #[arg(long, env = "SOCKET_DEMO_USER_ID")]
    user_id: Option<String>,

    /// Number of button presses to simulate.
    #[arg(long, default_value_t = 1)]
    count: usize,

    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Give up when a reply is outstanding and no message arrives for this long.
    #[arg(long, default_value_t = 2000)]
    timeout_ms: u64,
}

impl Cli {
    fn plan(&self) -> PingPlan {
        PingPlan {
            count: self.count,
            interval: Duration::from_millis(self.interval_ms),
            idle: Duration::from_millis(self.timeout_ms),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (mut stream, _) = connect_async(cli.url.as_str())
        .await
        .map_err(|error| CliError::WsConnect(Box::new(error)))?;
    tracing::info!(url = %cli.url, "connected");

    let mut driver = ClientDriver::new(cli.user_id.clone());
    driver.on_view_shown();
    print_unread(&mut driver);

    let result = session::run_pings(&cli.plan(), &mut stream, &mut driver, |line| println!("{line}")).await;

    driver.on_view_destroyed();
    tracing::debug!(state = ?driver.state(), lines = driver.log().len(), "view destroyed");
    let _ = stream.close(None).await;
    result.map_err(CliError::from)
}

fn print_unread(driver: &mut ClientDriver) {
    for line in driver.unread() {
        println!("{line}");
    }
}
