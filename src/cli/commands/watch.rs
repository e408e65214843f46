use crate::cli::Desk;
use crate::error::{DeskError, Result};
use crate::notifications::scheduler;
use std::sync::Arc;

pub async fn execute(desk: Desk) -> Result<()> {
    let handle = scheduler::spawn(Arc::new(desk.repo));

    println!(
        "Watching for expiring plans every {}h. Press Ctrl-C to stop.",
        scheduler::CHECK_PERIOD.as_secs() / 3600
    );

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| DeskError::Scheduler(format!("Failed to listen for Ctrl-C: {}", e)))?;

    tracing::info!("Stopping expiry checks");
    handle.shutdown().await
}
