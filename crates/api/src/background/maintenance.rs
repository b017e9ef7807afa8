//! In-process maintenance loop for deployments without an external scheduler.
//!
//! Runs the campaign expiry sweep and the cart abandonment sweep on a fixed
//! interval. Disabled unless `MAINTENANCE_INTERVAL_SECS` is set. Both sweeps
//! are idempotent, so running alongside the `/cron` endpoints is harmless.

use std::time::Duration;

use chrono::Utc;
use dukkan_core::cart::AbandonmentDetector;
use dukkan_core::lifecycle::CampaignLifecycle;
use dukkan_core::ports::{CampaignStore, CartStore, ProductPriceStore};
use tokio_util::sync::CancellationToken;

/// Run both sweeps once. Failures are logged and never stop the loop.
pub async fn run_once<S>(store: &S)
where
    S: CampaignStore + ProductPriceStore + CartStore,
{
    let now = Utc::now();

    match CampaignLifecycle::new(store).expiry_sweep(now).await {
        Ok(0) => tracing::debug!("Maintenance: no expired campaigns"),
        Ok(cleaned) => tracing::info!(cleaned, "Maintenance: expired campaigns deactivated"),
        Err(e) => tracing::error!(error = %e, "Maintenance: expiry sweep failed"),
    }

    if let Err(e) = AbandonmentDetector::new(store).sweep(now).await {
        tracing::error!(error = %e, "Maintenance: abandonment sweep failed");
    }
}

/// Run the maintenance loop until `cancel` is triggered.
pub async fn run<S>(store: S, interval: Duration, cancel: CancellationToken)
where
    S: CampaignStore + ProductPriceStore + CartStore,
{
    tracing::info!(interval_secs = interval.as_secs(), "Maintenance job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Maintenance job stopping");
                break;
            }
            _ = ticker.tick() => run_once(&store).await,
        }
    }
}
