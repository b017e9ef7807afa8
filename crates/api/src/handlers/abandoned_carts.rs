//! Admin abandoned-cart dashboard and reminder dispatch.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use dukkan_core::error::CoreError;
use dukkan_core::reminder::{cooldown_window_start, ReminderRequest};
use dukkan_core::types::DbId;
use dukkan_db::repositories::CartRepo;
use dukkan_events::ReminderDispatcher;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/carts/abandoned
///
/// Abandoned carts that have items and a recipient, most recent first.
pub async fn list_abandoned(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let carts = CartRepo::list_abandoned(&state.pool, params.limit(), params.offset()).await?;
    Ok(Json(DataResponse { data: carts }))
}

/// GET /api/v1/admin/carts/abandoned/stats
pub async fn abandoned_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let since = cooldown_window_start(Utc::now());
    let stats = CartRepo::abandoned_stats(&state.pool, since).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// POST /api/v1/admin/carts/{id}/remind
///
/// Send one reminder email. The body may carry a coupon code, a subject and
/// a message; the path id always wins over a `cart_id` in the body.
pub async fn send_reminder(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(cart_id): Path<DbId>,
    body: Option<Json<ReminderRequest>>,
) -> AppResult<impl IntoResponse> {
    let mailer = state.mailer.as_deref().ok_or_else(|| {
        CoreError::Delivery("email delivery is not configured".into())
    })?;

    let mut request = body.map(|Json(r)| r).unwrap_or_default();
    request.cart_id = cart_id;

    let receipt = ReminderDispatcher::new(&state.store, mailer)
        .dispatch(&request, Utc::now())
        .await?;

    tracing::info!(cart_id, user_id = admin.user_id, "Reminder dispatched by admin");
    Ok(Json(DataResponse { data: receipt }))
}
