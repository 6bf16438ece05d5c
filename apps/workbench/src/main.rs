mod api;
mod config;
mod console;
mod controller;
mod render;
mod sample;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::BackendClient;
use crate::config::Config;
use crate::console::Console;
use crate::controller::Workbench;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging. Logs go to stderr; stdout belongs to
    // the console UI.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting Cover Letter Workbench v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = BackendClient::new(
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    info!("backend client initialized (base url: {})", config.base_url);

    let workbench = Workbench::new(Arc::new(client));

    Console::new(workbench).run().await
}
