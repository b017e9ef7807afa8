//! Coupon code check.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use dukkan_core::campaign::{check_coupon, normalize_code, Campaign};
use dukkan_db::repositories::CampaignRepo;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckCoupon {
    pub code: String,
    pub cart_total: Decimal,
}

/// POST /api/v1/coupons/check
///
/// Returns the discount the code grants on `cart_total`. Inapplicable codes
/// are rejected with 400.
pub async fn check(
    State(state): State<AppState>,
    Json(input): Json<CheckCoupon>,
) -> AppResult<impl IntoResponse> {
    if input.cart_total < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "cart_total must not be negative".into(),
        ));
    }
    let code = normalize_code(Some(&input.code))
        .ok_or_else(|| AppError::BadRequest("code must not be empty".into()))?;

    let row = CampaignRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("coupon {code}")))?;
    let campaign = Campaign::try_from(row)?;

    let quote = check_coupon(&campaign, input.cart_total, Utc::now())?;
    tracing::debug!(code = %code, discount = %quote.discount, "Coupon accepted");

    Ok(Json(DataResponse { data: quote }))
}
