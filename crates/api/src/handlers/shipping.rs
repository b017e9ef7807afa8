//! Shipping quote for a cart total.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use dukkan_core::money::round_currency;
use dukkan_core::shipping::{ShippingResolver, ShippingRule};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub cart_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ShippingQuote {
    pub cart_total: Decimal,
    pub free_shipping: bool,
    pub shipping_fee: Decimal,
    /// The rule that granted free shipping, if any.
    pub matched: Option<ShippingRule>,
}

/// GET /api/v1/shipping/quote?cart_total=
///
/// Resolve whether `cart_total` ships free. Storage failures resolve to
/// "not free" rather than an error.
pub async fn quote(
    State(state): State<AppState>,
    Query(params): Query<QuoteParams>,
) -> AppResult<impl IntoResponse> {
    if params.cart_total < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "cart_total must not be negative".into(),
        ));
    }

    let cart_total = round_currency(params.cart_total);
    let decision = ShippingResolver::new(&state.store)
        .resolve(cart_total, Utc::now())
        .await;

    Ok(Json(DataResponse {
        data: ShippingQuote {
            cart_total,
            free_shipping: decision.free_shipping,
            shipping_fee: decision.shipping_fee(state.config.flat_shipping_fee),
            matched: decision.matched,
        },
    }))
}
