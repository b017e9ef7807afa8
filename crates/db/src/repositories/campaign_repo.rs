//! Repository for the `campaigns` table.

use dukkan_core::campaign::{join_id_list, CampaignDraft, CampaignType};
use dukkan_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::campaign::CampaignRow;

/// Column list for `campaigns` queries.
const COLUMNS: &str = "\
    id, title, description, campaign_type, scope, value, code, \
    min_amount, max_discount, target_categories, target_products, \
    usage_limit, usage_count, is_active, start_date, end_date, \
    created_at, updated_at";

/// Provides CRUD and lifecycle queries for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a validated draft, returning the full row.
    ///
    /// A duplicate code violates `uq_campaigns_code`.
    pub async fn create(pool: &PgPool, draft: &CampaignDraft) -> Result<CampaignRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns \
                (title, description, campaign_type, scope, value, code, \
                 min_amount, max_discount, target_categories, target_products, \
                 usage_limit, is_active, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignRow>(&query)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.campaign_type.as_str())
            .bind(draft.scope.as_str())
            .bind(draft.value)
            .bind(&draft.code)
            .bind(draft.min_amount)
            .bind(draft.max_discount)
            .bind(join_id_list(&draft.target_categories))
            .bind(join_id_list(&draft.target_products))
            .bind(draft.usage_limit)
            .bind(draft.is_active)
            .bind(draft.start_date)
            .bind(draft.end_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CampaignRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, CampaignRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a campaign by its (already normalized) coupon code.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<CampaignRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE code = $1");
        sqlx::query_as::<_, CampaignRow>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List campaigns, newest first, optionally only active ones.
    pub async fn list(
        pool: &PgPool,
        active_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CampaignRow>, sqlx::Error> {
        let where_clause = if active_only {
            "WHERE is_active = TRUE"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, CampaignRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Replace the editable fields of a campaign. The active flag is owned by
    /// the lifecycle and is left untouched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &CampaignDraft,
    ) -> Result<Option<CampaignRow>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET \
                title = $2, description = $3, campaign_type = $4, scope = $5, \
                value = $6, code = $7, min_amount = $8, max_discount = $9, \
                target_categories = $10, target_products = $11, usage_limit = $12, \
                start_date = $13, end_date = $14, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignRow>(&query)
            .bind(id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.campaign_type.as_str())
            .bind(draft.scope.as_str())
            .bind(draft.value)
            .bind(&draft.code)
            .bind(draft.min_amount)
            .bind(draft.max_discount)
            .bind(join_id_list(&draft.target_categories))
            .bind(join_id_list(&draft.target_products))
            .bind(draft.usage_limit)
            .bind(draft.start_date)
            .bind(draft.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Set the active flag. Returns `true` if a row was updated.
    pub async fn set_active(pool: &PgPool, id: DbId, active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET is_active = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(active)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active campaigns whose end date is before `now`.
    pub async fn list_expired_active(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<CampaignRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns \
             WHERE is_active = TRUE AND end_date < $1 \
             ORDER BY id"
        );
        sqlx::query_as::<_, CampaignRow>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Active FREE_SHIPPING campaigns inside their date window.
    pub async fn list_running_free_shipping(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<CampaignRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns \
             WHERE is_active = TRUE AND campaign_type = $1 \
               AND start_date <= $2 AND end_date >= $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, CampaignRow>(&query)
            .bind(CampaignType::FreeShipping.as_str())
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Delete a campaign row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
