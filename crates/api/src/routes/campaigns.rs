//! Route definitions for admin campaign management.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Admin campaign routes mounted at `/admin/campaigns`.
///
/// ```text
/// GET    /                 -> list_campaigns
/// POST   /                 -> create_campaign
/// GET    /{id}             -> get_campaign
/// PUT    /{id}             -> update_campaign
/// DELETE /{id}             -> delete_campaign
/// POST   /{id}/activate    -> activate_campaign
/// POST   /{id}/deactivate  -> deactivate_campaign
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/{id}",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::delete_campaign),
        )
        .route("/{id}/activate", post(campaigns::activate_campaign))
        .route("/{id}/deactivate", post(campaigns::deactivate_campaign))
}
