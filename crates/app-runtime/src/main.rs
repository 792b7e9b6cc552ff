//! # Treewatch Runtime
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`RUST_LOG`, else `TREEWATCH_LOG_LEVEL`, else `info`)
//! 2. Load and validate configuration
//! 3. Open storage and wire the subsystems
//! 4. Start the audit handler
//! 5. Wait for Ctrl+C, then shut down

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use app_runtime::container::{load_config, AppConfig, LoggingConfig, ServiceContainer};
use app_runtime::handlers::AuditHandler;
use app_runtime::TreewatchApp;

/// The running application.
struct TreewatchRuntime {
    app: TreewatchApp,
    shutdown_tx: watch::Sender<bool>,
    audit: Option<JoinHandle<usize>>,
}

impl TreewatchRuntime {
    fn new(config: AppConfig) -> Result<Self> {
        let container =
            ServiceContainer::new(config).context("failed to initialize services")?;
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            app: TreewatchApp::new(Arc::new(container)),
            shutdown_tx,
            audit: None,
        })
    }

    async fn start(&mut self) -> Result<()> {
        let handler = AuditHandler::new(&self.app.container().event_bus);
        self.audit = Some(tokio::spawn(handler.run(self.shutdown_tx.subscribe())));

        let summary = self
            .app
            .summary()
            .await
            .context("failed to read the record store")?;
        info!(
            total = summary.total,
            active = summary.active,
            flagged = summary.flagged,
            deleted = summary.deleted,
            "Record store ready"
        );
        Ok(())
    }

    async fn shutdown(mut self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        if let Some(audit) = self.audit.take() {
            match audit.await {
                Ok(handled) => info!(handled, "Audit handler stopped"),
                Err(e) => error!("Audit handler failed: {}", e),
            }
        }

        info!("Shutdown complete");
    }
}

fn init_logging() -> Result<()> {
    let fallback = std::env::var("TREEWATCH_LOG_LEVEL")
        .unwrap_or_else(|_| LoggingConfig::default().level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .context("invalid log filter")?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config = load_config();
    config.validate().context("invalid configuration")?;

    let mut runtime = TreewatchRuntime::new(config)?;
    runtime.start().await?;

    info!("Treewatch is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    Ok(())
}
