#![allow(dead_code)]

use chrono::{Duration, Utc};
use dukkan_core::campaign::{CampaignDraft, CampaignScope, CampaignType};
use dukkan_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn insert_category(pool: &PgPool, slug: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO categories (name, slug) VALUES ($1, $1) RETURNING id")
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_product(
    pool: &PgPool,
    category_id: Option<DbId>,
    slug: &str,
    price: Decimal,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO products (category_id, name, slug, price, stock) \
         VALUES ($1, $2, $2, $3, 10) RETURNING id",
    )
    .bind(category_id)
    .bind(slug)
    .bind(price)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_user(pool: &PgPool, email: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO users (email) VALUES ($1) RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Backdate a cart's last activity.
pub async fn set_cart_updated_at(pool: &PgPool, cart_id: DbId, at: Timestamp) {
    sqlx::query("UPDATE carts SET updated_at = $2 WHERE id = $1")
        .bind(cart_id)
        .bind(at)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn set_cart_status(pool: &PgPool, cart_id: DbId, status: &str) {
    sqlx::query("UPDATE carts SET status = $2 WHERE id = $1")
        .bind(cart_id)
        .bind(status)
        .execute(pool)
        .await
        .unwrap();
}

/// An inactive ALL-scope 10% campaign running from yesterday for a week.
pub fn draft(title: &str) -> CampaignDraft {
    let now = Utc::now();
    CampaignDraft {
        title: title.to_string(),
        description: None,
        campaign_type: CampaignType::Percentage,
        scope: CampaignScope::All,
        value: dec!(10),
        code: None,
        min_amount: None,
        max_discount: None,
        target_categories: vec![],
        target_products: vec![],
        usage_limit: None,
        is_active: false,
        start_date: now - Duration::days(1),
        end_date: now + Duration::days(7),
    }
}
