//! Repository for the `carts` and `cart_items` tables.

use dukkan_core::cart::CartStatus;
use dukkan_core::reminder::MAIL_TYPE_CART_REMINDER;
use dukkan_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::cart::{
    AbandonedCart, AbandonedCartStats, Cart, CartItemView, CartRecipientRow, CreateCart,
};

/// Column list for `carts` queries.
const COLUMNS: &str = "id, user_id, session_id, email, status, total, created_at, updated_at";

/// Recipient email of a cart `c` joined with its owner `u`.
const RECIPIENT_EXPR: &str = "COALESCE(NULLIF(TRIM(c.email), ''), u.email)";

/// `mail_logs.email` key of [`RECIPIENT_EXPR`].
const RECIPIENT_KEY_EXPR: &str = "LOWER(TRIM(COALESCE(NULLIF(TRIM(c.email), ''), u.email)))";

pub struct CartRepo;

impl CartRepo {
    pub async fn create(pool: &PgPool, input: &CreateCart) -> Result<Cart, sqlx::Error> {
        let query = format!(
            "INSERT INTO carts (user_id, session_id, email) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cart>(&query)
            .bind(input.user_id)
            .bind(&input.session_id)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Cart>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM carts WHERE id = $1");
        sqlx::query_as::<_, Cart>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Cart header with the owning user's email.
    pub async fn find_recipient(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CartRecipientRow>, sqlx::Error> {
        sqlx::query_as::<_, CartRecipientRow>(
            "SELECT c.id, c.status, c.email, u.email AS user_email, c.total, c.updated_at \
             FROM carts c \
             LEFT JOIN users u ON u.id = c.user_id \
             WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Items of a cart with product names, in insertion order.
    pub async fn list_items(pool: &PgPool, cart_id: DbId) -> Result<Vec<CartItemView>, sqlx::Error> {
        sqlx::query_as::<_, CartItemView>(
            "SELECT ci.id, ci.product_id, p.name AS product_name, ci.quantity, ci.unit_price \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.cart_id = $1 \
             ORDER BY ci.id",
        )
        .bind(cart_id)
        .fetch_all(pool)
        .await
    }

    /// Add `quantity` of a product, merging with an existing line.
    pub async fn upsert_item(
        pool: &PgPool,
        cart_id: DbId,
        product_id: DbId,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity, unit_price) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (cart_id, product_id) DO UPDATE \
             SET quantity = cart_items.quantity + EXCLUDED.quantity, \
                 unit_price = EXCLUDED.unit_price",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Set a line's quantity. Returns `false` if the line does not exist.
    pub async fn set_item_quantity(
        pool: &PgPool,
        cart_id: DbId,
        product_id: DbId,
        quantity: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a line. Returns `false` if the line does not exist.
    pub async fn remove_item(
        pool: &PgPool,
        cart_id: DbId,
        product_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(product_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reprice every line at the product's effective price, recompute the
    /// total and touch `updated_at`. An ABANDONED cart becomes ACTIVE again.
    pub async fn refresh(pool: &PgPool, cart_id: DbId) -> Result<Option<Cart>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE cart_items ci \
             SET unit_price = COALESCE(p.sale_price, p.price) \
             FROM products p \
             WHERE p.id = ci.product_id AND ci.cart_id = $1",
        )
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE carts SET \
                total = COALESCE( \
                    (SELECT SUM(quantity * unit_price) FROM cart_items WHERE cart_id = $1), 0), \
                status = CASE WHEN status = $2 THEN $3 ELSE status END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let cart = sqlx::query_as::<_, Cart>(&query)
            .bind(cart_id)
            .bind(CartStatus::Abandoned.as_str())
            .bind(CartStatus::Active.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(cart)
    }

    /// Flip ACTIVE carts last updated at or before `cutoff` to ABANDONED.
    pub async fn mark_idle_abandoned(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE carts SET status = $1 WHERE status = $2 AND updated_at <= $3")
            .bind(CartStatus::Abandoned.as_str())
            .bind(CartStatus::Active.as_str())
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Abandoned carts worth reminding: non-empty, with a recipient.
    ///
    /// Ordered by most recently abandoned first.
    pub async fn list_abandoned(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AbandonedCart>, sqlx::Error> {
        let query = format!(
            "SELECT c.id, c.email, u.email AS user_email, c.total, \
                    (SELECT COUNT(*) FROM cart_items ci WHERE ci.cart_id = c.id) AS item_count, \
                    c.updated_at, \
                    (SELECT MAX(m.sent_at) FROM mail_logs m \
                     WHERE m.email = {RECIPIENT_KEY_EXPR} AND m.mail_type = $2) AS last_reminder_at \
             FROM carts c \
             LEFT JOIN users u ON u.id = c.user_id \
             WHERE c.status = $1 AND c.total > 0 \
               AND EXISTS (SELECT 1 FROM cart_items ci WHERE ci.cart_id = c.id) \
               AND {RECIPIENT_EXPR} IS NOT NULL \
             ORDER BY c.updated_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, AbandonedCart>(&query)
            .bind(CartStatus::Abandoned.as_str())
            .bind(MAIL_TYPE_CART_REMINDER)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count and value of abandoned carts plus reminders sent since `since`.
    pub async fn abandoned_stats(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<AbandonedCartStats, sqlx::Error> {
        sqlx::query_as::<_, AbandonedCartStats>(
            "SELECT \
                (SELECT COUNT(*) FROM carts WHERE status = $1 AND total > 0) AS abandoned_count, \
                (SELECT COALESCE(SUM(total), 0) FROM carts WHERE status = $1) AS abandoned_value, \
                (SELECT COUNT(*) FROM mail_logs WHERE mail_type = $2 AND sent_at > $3) \
                    AS reminders_last_24h",
        )
        .bind(CartStatus::Abandoned.as_str())
        .bind(MAIL_TYPE_CART_REMINDER)
        .bind(since)
        .fetch_one(pool)
        .await
    }
}
