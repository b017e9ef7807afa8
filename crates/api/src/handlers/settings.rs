//! Admin key-value settings.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use dukkan_core::money::parse_positive_amount;
use dukkan_core::shipping::FREE_SHIPPING_MIN_AMOUNT_KEY;
use dukkan_db::models::setting::UpsertSetting;
use dukkan_db::repositories::SettingRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted setting key.
const MAX_KEY_LEN: usize = 100;

/// GET /api/v1/admin/settings/{key}
pub async fn get_setting(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let setting = SettingRepo::get(&state.pool, &key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("setting {key}")))?;
    Ok(Json(DataResponse { data: setting }))
}

/// PUT /api/v1/admin/settings/{key}
///
/// Known keys are type-checked; `free_shipping_min_amount` must be a
/// positive amount.
pub async fn put_setting(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<UpsertSetting>,
) -> AppResult<impl IntoResponse> {
    let key = key.trim().to_string();
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(AppError::BadRequest(format!(
            "setting key must be 1 to {MAX_KEY_LEN} characters"
        )));
    }
    let value = input.value.trim();
    if key == FREE_SHIPPING_MIN_AMOUNT_KEY && parse_positive_amount(value).is_none() {
        return Err(AppError::BadRequest(format!(
            "{FREE_SHIPPING_MIN_AMOUNT_KEY} must be a positive amount"
        )));
    }

    let setting = SettingRepo::upsert(&state.pool, &key, value).await?;
    tracing::info!(key = %key, value = %value, user_id = admin.user_id, "Setting updated");
    Ok(Json(DataResponse { data: setting }))
}
