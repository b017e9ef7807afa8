//! Storefront cart endpoints.
//!
//! Every mutation reprices the cart from current effective prices and
//! touches `updated_at`, which also revives an abandoned cart.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use dukkan_core::cart::CartStatus;
use dukkan_core::error::CoreError;
use dukkan_core::types::DbId;
use dukkan_db::models::cart::{AddCartItem, Cart, CartWithItems, CreateCart, UpdateCartItem};
use dukkan_db::repositories::{CartRepo, ProductRepo};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_cart(pool: &PgPool, cart_id: DbId) -> AppResult<Cart> {
    CartRepo::find_by_id(pool, cart_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "cart",
            id: cart_id,
        }))
}

/// Load a cart that may still be modified.
async fn load_open_cart(pool: &PgPool, cart_id: DbId) -> AppResult<Cart> {
    let cart = load_cart(pool, cart_id).await?;
    if cart.status == CartStatus::Ordered.as_str() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "cart {cart_id} has already been ordered"
        ))));
    }
    Ok(cart)
}

/// Reprice, touch and return the cart with its lines.
async fn refreshed(pool: &PgPool, cart_id: DbId) -> AppResult<CartWithItems> {
    let cart = CartRepo::refresh(pool, cart_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "cart",
            id: cart_id,
        }))?;
    let items = CartRepo::list_items(pool, cart_id).await?;
    Ok(CartWithItems { cart, items })
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/carts
///
/// Create an empty cart for a guest session or a member.
pub async fn create_cart(
    State(state): State<AppState>,
    Json(input): Json<CreateCart>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if input.user_id.is_none() && input.session_id.is_none() {
        return Err(AppError::BadRequest(
            "either user_id or session_id is required".into(),
        ));
    }

    let cart = CartRepo::create(&state.pool, &input).await?;
    tracing::info!(cart_id = cart.id, user_id = ?cart.user_id, "Cart created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CartWithItems {
                cart,
                items: Vec::new(),
            },
        }),
    ))
}

/// GET /api/v1/carts/{id}
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let cart = load_cart(&state.pool, cart_id).await?;
    let items = CartRepo::list_items(&state.pool, cart_id).await?;
    Ok(Json(DataResponse {
        data: CartWithItems { cart, items },
    }))
}

/// POST /api/v1/carts/{id}/items
///
/// Add a product, merging with an existing line for the same product.
pub async fn add_item(
    State(state): State<AppState>,
    Path(cart_id): Path<DbId>,
    Json(input): Json<AddCartItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    load_open_cart(&state.pool, cart_id).await?;

    let product = ProductRepo::find_by_id(&state.pool, input.product_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "product",
            id: input.product_id,
        }))?;

    CartRepo::upsert_item(
        &state.pool,
        cart_id,
        product.id,
        input.quantity,
        product.effective_price(),
    )
    .await?;

    let cart = refreshed(&state.pool, cart_id).await?;
    tracing::info!(
        cart_id,
        product_id = product.id,
        quantity = input.quantity,
        total = %cart.cart.total,
        "Cart item added",
    );
    Ok(Json(DataResponse { data: cart }))
}

/// PUT /api/v1/carts/{id}/items/{product_id}
///
/// Set a line's quantity. A quantity of zero removes the line.
pub async fn set_item_quantity(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCartItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    load_open_cart(&state.pool, cart_id).await?;

    let found = if input.quantity == 0 {
        CartRepo::remove_item(&state.pool, cart_id, product_id).await?
    } else {
        CartRepo::set_item_quantity(&state.pool, cart_id, product_id, input.quantity).await?
    };
    if !found {
        return Err(AppError::NotFound(format!(
            "product {product_id} is not in cart {cart_id}"
        )));
    }

    let cart = refreshed(&state.pool, cart_id).await?;
    tracing::info!(cart_id, product_id, quantity = input.quantity, "Cart item updated");
    Ok(Json(DataResponse { data: cart }))
}

/// DELETE /api/v1/carts/{id}/items/{product_id}
pub async fn remove_item(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    load_open_cart(&state.pool, cart_id).await?;

    if !CartRepo::remove_item(&state.pool, cart_id, product_id).await? {
        return Err(AppError::NotFound(format!(
            "product {product_id} is not in cart {cart_id}"
        )));
    }

    let cart = refreshed(&state.pool, cart_id).await?;
    tracing::info!(cart_id, product_id, "Cart item removed");
    Ok(Json(DataResponse { data: cart }))
}
