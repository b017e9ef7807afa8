//! Cart, cart item and abandoned-cart models and DTOs.

use dukkan_core::cart::CartLine;
use dukkan_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

/// A row from the `carts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cart {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub session_id: Option<String>,
    pub email: Option<String>,
    pub status: String,
    pub total: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a cart. Guests pass a session id, members a user id.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCart {
    pub user_id: Option<DbId>,
    #[validate(length(min = 1, max = 128))]
    pub session_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Recipient columns of a cart joined with its owner.
#[derive(Debug, Clone, FromRow)]
pub struct CartRecipientRow {
    pub id: DbId,
    pub status: String,
    pub email: Option<String>,
    pub user_email: Option<String>,
    pub total: Decimal,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Cart items
// ---------------------------------------------------------------------------

/// A cart item joined with its product name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartItemView {
    pub id: DbId,
    pub product_id: DbId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl From<CartItemView> for CartLine {
    fn from(item: CartItemView) -> Self {
        CartLine {
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddCartItem {
    pub product_id: DbId,
    #[validate(range(min = 1, max = 999))]
    pub quantity: i32,
}

/// A quantity of zero removes the line.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCartItem {
    #[validate(range(min = 0, max = 999))]
    pub quantity: i32,
}

/// A cart with its lines, as returned by `GET /carts/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct CartWithItems {
    #[serde(flatten)]
    pub cart: Cart,
    pub items: Vec<CartItemView>,
}

// ---------------------------------------------------------------------------
// Abandoned carts (admin)
// ---------------------------------------------------------------------------

/// An abandoned cart with contents, for the admin reminder list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AbandonedCart {
    pub id: DbId,
    pub email: Option<String>,
    pub user_email: Option<String>,
    pub total: Decimal,
    pub item_count: i64,
    pub updated_at: Timestamp,
    pub last_reminder_at: Option<Timestamp>,
}

/// Aggregate figures for the abandoned-cart dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AbandonedCartStats {
    pub abandoned_count: i64,
    pub abandoned_value: Decimal,
    pub reminders_last_24h: i64,
}
