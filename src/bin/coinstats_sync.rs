use anyhow::Result;
use coinstats_sync::{logging, Config, SyncService};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing; guard flushes the log file on drop
    let _guard = logging::init_logging(&config.logging.file)?;
    info!("Configuration loaded successfully");
    config.log_summary();

    // Fetch and upsert failures are reported in the log only
    let service = SyncService::new(config)?;
    let _report = service.run().await;

    Ok(())
}
