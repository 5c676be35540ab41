pub mod api;
pub mod catalog;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod pipeline;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::server::ServerError;
use crate::config::AppConfig;
use crate::core_state::{CoreError, CoreState};

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Start the report server and block until Ctrl-C.
pub fn run() -> Result<(), RunError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env();
    let core = Arc::new(CoreState::from_config(config));
    core.initialize()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(core))
}

async fn serve(core: Arc<CoreState>) -> Result<(), RunError> {
    let host = core.config.host.clone();
    let port = core.config.port;
    let root_url = core.config.root_url();
    let open_browser = core.config.open_browser;

    let server = api::start_server(core, &host, port).await?;
    tracing::info!(addr = %server.addr, url = %root_url, "Intake form available");

    if open_browser {
        if let Err(e) = pipeline::notify::web_handoff::open_in_browser(&root_url) {
            tracing::warn!(error = %e, "Could not open browser, visit {root_url} manually");
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }
    server.stop().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
