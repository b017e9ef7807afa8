//! Storefront product listing.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use dukkan_core::types::DbId;
use dukkan_db::models::product::ProductListItem;
use dukkan_db::repositories::ProductRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::query::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    pub category_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/products
///
/// List active products with their effective price (sale price when a
/// campaign applies, else list price).
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<impl IntoResponse> {
    let products = ProductRepo::list(
        &state.pool,
        params.category_id,
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;

    let data: Vec<ProductListItem> = products.into_iter().map(ProductListItem::from).collect();
    Ok(Json(DataResponse { data }))
}
