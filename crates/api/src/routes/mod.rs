pub mod admin;
pub mod campaigns;
pub mod cron;
pub mod health;
pub mod storefront;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /products                                 list with effective price (GET)
/// /shipping/quote?cart_total=               shipping decision (GET)
/// /coupons/check                            check coupon (POST)
///
/// /carts                                    create (POST)
/// /carts/{id}                               get (GET)
/// /carts/{id}/items                         add item (POST)
/// /carts/{id}/items/{product_id}            set quantity, remove (PUT, DELETE)
///
/// /admin/campaigns                          list, create (admin only)
/// /admin/campaigns/{id}                     get, update, delete
/// /admin/campaigns/{id}/activate            activate (POST)
/// /admin/campaigns/{id}/deactivate          deactivate (POST)
///
/// /admin/carts/abandoned                    list abandoned carts (GET)
/// /admin/carts/abandoned/stats              dashboard figures (GET)
/// /admin/carts/{id}/remind                  send reminder email (POST)
///
/// /admin/settings/{key}                     get, put (GET, PUT)
///
/// /cron/expire-campaigns                    expiry sweep (POST, cron secret)
/// /cron/abandoned-carts                     abandonment sweep (POST, cron secret)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", storefront::products_router())
        .nest("/shipping", storefront::shipping_router())
        .nest("/coupons", storefront::coupons_router())
        .nest("/carts", storefront::carts_router())
        .nest("/admin/campaigns", campaigns::router())
        .nest("/admin/carts", admin::carts_router())
        .nest("/admin/settings", admin::settings_router())
        .nest("/cron", cron::router())
}
