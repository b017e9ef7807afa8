//! Route definitions for admin cart and settings endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{abandoned_carts, settings};
use crate::state::AppState;

/// Admin cart routes mounted at `/admin/carts`.
///
/// ```text
/// GET  /abandoned        -> list_abandoned
/// GET  /abandoned/stats  -> abandoned_stats
/// POST /{id}/remind      -> send_reminder
/// ```
pub fn carts_router() -> Router<AppState> {
    Router::new()
        .route("/abandoned", get(abandoned_carts::list_abandoned))
        .route("/abandoned/stats", get(abandoned_carts::abandoned_stats))
        .route("/{id}/remind", post(abandoned_carts::send_reminder))
}

/// Admin settings routes mounted at `/admin/settings`.
///
/// ```text
/// GET /{key}  -> get_setting
/// PUT /{key}  -> put_setting
/// ```
pub fn settings_router() -> Router<AppState> {
    Router::new().route(
        "/{key}",
        get(settings::get_setting).put(settings::put_setting),
    )
}
