//! Repository for the `products` table.

use dukkan_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::product::{Product, ProductPriceRow};

/// Column list for `products` queries.
const COLUMNS: &str = "\
    id, category_id, name, slug, price, sale_price, active_campaign_id, \
    stock, is_active, created_at, updated_at";

/// Price columns read by the campaign lifecycle.
const PRICE_COLUMNS: &str = "id, category_id, price, sale_price, active_campaign_id";

pub struct ProductRepo;

impl ProductRepo {
    /// List active products, optionally within one category.
    pub async fn list(
        pool: &PgPool,
        category_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE is_active = TRUE AND ($1::BIGINT IS NULL OR category_id = $1) \
             ORDER BY id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(category_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Price rows of every product.
    pub async fn list_all_prices(pool: &PgPool) -> Result<Vec<ProductPriceRow>, sqlx::Error> {
        let query = format!("SELECT {PRICE_COLUMNS} FROM products ORDER BY id");
        sqlx::query_as::<_, ProductPriceRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Price rows of products in any of `category_ids`.
    pub async fn list_prices_by_categories(
        pool: &PgPool,
        category_ids: &[DbId],
    ) -> Result<Vec<ProductPriceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {PRICE_COLUMNS} FROM products WHERE category_id = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, ProductPriceRow>(&query)
            .bind(category_ids)
            .fetch_all(pool)
            .await
    }

    /// Price rows of products whose id is in `ids`.
    pub async fn list_prices_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ProductPriceRow>, sqlx::Error> {
        let query = format!("SELECT {PRICE_COLUMNS} FROM products WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, ProductPriceRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Ids of products currently priced by `campaign_id`.
    pub async fn ids_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM products WHERE active_campaign_id = $1 ORDER BY id",
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
    }

    /// Write a campaign sale price. Returns `true` if the product exists.
    pub async fn apply_sale_price(
        pool: &PgPool,
        id: DbId,
        sale_price: Decimal,
        campaign_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products \
             SET sale_price = $2, active_campaign_id = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(sale_price)
        .bind(campaign_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reset `sale_price` and `active_campaign_id` to NULL.
    pub async fn clear_sale_price(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products \
             SET sale_price = NULL, active_campaign_id = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
