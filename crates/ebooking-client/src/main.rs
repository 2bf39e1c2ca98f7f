//! E-Booking client application entry point.
//!
//! Wires together configuration, the TCP connection, and the console UI,
//! then hands everything to the session use case:
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML config, defaults on first run
//!  └─ save_config()            -- first run only: write the defaults out
//!  └─ connect()                -- TCP connect with retry
//!  └─ Channel::read_greeting() -- one blocking read for the greeting
//!  └─ Session::run()           -- screen loop until Exit
//! ```
//!
//! Pass `--config <path>` to read settings from an explicit file instead
//! of the platform config directory.

use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ebooking_client::application::session::Session;
use ebooking_client::infrastructure::network::connect;
use ebooking_client::infrastructure::storage::config::{
    config_file_path, load_config, load_config_from, save_config,
};
use ebooking_client::infrastructure::ui_bridge::ConsoleScreenIo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let explicit_config = config_path_from_args()?;
    let config = match &explicit_config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => load_config().context("failed to load config")?,
    };

    // Initialise structured logging.  RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.client.log_level)),
        )
        .init();

    // First run without an explicit path: write the defaults out so users
    // have a file to edit.
    if explicit_config.is_none() {
        if let Ok(path) = config_file_path() {
            if !path.exists() {
                match save_config(&config) {
                    Ok(()) => info!(path = %path.display(), "wrote default config"),
                    Err(e) => warn!(error = %e, "could not write default config"),
                }
            }
        }
    }

    let connector = config.connector();
    info!(addr = %connector.addr(), "E-Booking client starting");

    let mut channel = connect(&connector).await?;
    let greeting = channel.read_greeting().await;

    let mut ui = ConsoleScreenIo::new();
    if let Some(text) = greeting {
        use ebooking_client::application::session::ScreenIo;
        ui.notify(&text).await;
    }

    Session::new(channel, ui).run().await;

    info!("E-Booking client stopped");
    Ok(())
}

/// Parses the only supported flag, `--config <path>`.
fn config_path_from_args() -> anyhow::Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => Ok(None),
        Some("--config") => match args.next() {
            Some(path) => Ok(Some(PathBuf::from(path))),
            None => anyhow::bail!("--config requires a path argument"),
        },
        Some(other) => anyhow::bail!("unrecognised argument: {other}"),
    }
}
