//! Campaign rows and their conversion into the domain [`Campaign`].

use dukkan_core::campaign::{parse_id_list, Campaign};
use dukkan_core::error::CoreError;
use dukkan_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignRow {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub campaign_type: String,
    pub scope: String,
    pub value: Decimal,
    pub code: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_discount: Option<Decimal>,
    pub target_categories: Option<String>,
    pub target_products: Option<String>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub is_active: bool,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = CoreError;

    fn try_from(row: CampaignRow) -> Result<Self, Self::Error> {
        Ok(Campaign {
            id: row.id,
            campaign_type: row.campaign_type.parse()?,
            scope: row.scope.parse()?,
            target_categories: parse_id_list(row.target_categories.as_deref()),
            target_products: parse_id_list(row.target_products.as_deref()),
            title: row.title,
            description: row.description,
            value: row.value,
            code: row.code,
            min_amount: row.min_amount,
            max_discount: row.max_discount,
            usage_limit: row.usage_limit,
            usage_count: row.usage_count,
            is_active: row.is_active,
            start_date: row.start_date,
            end_date: row.end_date,
        })
    }
}
