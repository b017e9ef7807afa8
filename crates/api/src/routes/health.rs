//! Root-level liveness endpoint for load balancers and the admin panel.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
///
/// Only the database decides `status`; missing mail or cron configuration
/// disables features without making the service unhealthy.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Reminder emails can be sent.
    pub mailer_configured: bool,
    /// `/api/v1/cron/*` accepts requests.
    pub cron_enabled: bool,
    /// In-process sweep interval, when the maintenance loop runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_interval_secs: Option<u64>,
}

fn status_label(db_healthy: bool) -> &'static str {
    if db_healthy {
        "ok"
    } else {
        "degraded"
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = dukkan_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check: database unreachable");
    }

    Json(HealthResponse {
        status: status_label(db_healthy),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        mailer_configured: state.mailer.is_some(),
        cron_enabled: state.config.cron_secret.is_some(),
        maintenance_interval_secs: state.config.maintenance_interval_secs,
    })
}

/// Mount at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
