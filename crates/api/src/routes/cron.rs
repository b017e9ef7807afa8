use axum::routing::post;
use axum::Router;

use crate::handlers::cron;
use crate::state::AppState;

/// Scheduler routes mounted at `/cron`, guarded by `CRON_SECRET`.
///
/// ```text
/// POST /expire-campaigns  -> expire_campaigns
/// POST /abandoned-carts   -> mark_abandoned_carts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/expire-campaigns", post(cron::expire_campaigns))
        .route("/abandoned-carts", post(cron::mark_abandoned_carts))
}
