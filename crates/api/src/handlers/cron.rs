//! Scheduler-triggered maintenance sweeps.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use dukkan_core::cart::AbandonmentDetector;
use dukkan_core::lifecycle::CampaignLifecycle;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::cron::CronAuth;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExpirySweepResult {
    pub cleaned: usize,
}

#[derive(Debug, Serialize)]
pub struct AbandonmentSweepResult {
    pub abandoned: u64,
}

/// POST /api/v1/cron/expire-campaigns
pub async fn expire_campaigns(
    _cron: CronAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let cleaned = CampaignLifecycle::new(&state.store)
        .expiry_sweep(Utc::now())
        .await?;
    tracing::info!(cleaned, "Expiry sweep finished");
    Ok(Json(DataResponse {
        data: ExpirySweepResult { cleaned },
    }))
}

/// POST /api/v1/cron/abandoned-carts
pub async fn mark_abandoned_carts(
    _cron: CronAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let abandoned = AbandonmentDetector::new(&state.store)
        .sweep(Utc::now())
        .await?;
    Ok(Json(DataResponse {
        data: AbandonmentSweepResult { abandoned },
    }))
}
