//! Public storefront routes: products, shipping quotes, coupons and carts.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{carts, coupons, products, shipping};
use crate::state::AppState;

/// Product routes mounted at `/products`.
///
/// ```text
/// GET /  -> list_products
/// ```
pub fn products_router() -> Router<AppState> {
    Router::new().route("/", get(products::list_products))
}

/// Shipping routes mounted at `/shipping`.
///
/// ```text
/// GET /quote  -> quote
/// ```
pub fn shipping_router() -> Router<AppState> {
    Router::new().route("/quote", get(shipping::quote))
}

/// Coupon routes mounted at `/coupons`.
///
/// ```text
/// POST /check  -> check
/// ```
pub fn coupons_router() -> Router<AppState> {
    Router::new().route("/check", post(coupons::check))
}

/// Cart routes mounted at `/carts`.
///
/// ```text
/// POST   /                          -> create_cart
/// GET    /{id}                      -> get_cart
/// POST   /{id}/items                -> add_item
/// PUT    /{id}/items/{product_id}   -> set_item_quantity
/// DELETE /{id}/items/{product_id}   -> remove_item
/// ```
pub fn carts_router() -> Router<AppState> {
    Router::new()
        .route("/", post(carts::create_cart))
        .route("/{id}", get(carts::get_cart))
        .route("/{id}/items", post(carts::add_item))
        .route(
            "/{id}/items/{product_id}",
            put(carts::set_item_quantity).delete(carts::remove_item),
        )
}
