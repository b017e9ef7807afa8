//! PostgreSQL implementation of the core persistence ports.

use dukkan_core::campaign::{Campaign, ProductTarget};
use dukkan_core::cart::{CartLine, CartSnapshot};
use dukkan_core::error::CoreError;
use dukkan_core::ports::{CampaignStore, CartStore, MailLogStore, ProductPriceStore, SettingsStore};
use dukkan_core::pricing::ProductPrice;
use dukkan_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;

use crate::models::campaign::CampaignRow;
use crate::repositories::{CampaignRepo, CartRepo, MailLogRepo, ProductRepo, SettingRepo};
use crate::DbPool;

/// Adapts the repositories to the core store traits.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn to_campaigns(rows: Vec<CampaignRow>) -> Result<Vec<Campaign>, CoreError> {
    rows.into_iter().map(Campaign::try_from).collect()
}

impl CampaignStore for PgStore {
    async fn find_campaign(&self, id: DbId) -> Result<Option<Campaign>, CoreError> {
        CampaignRepo::find_by_id(&self.pool, id)
            .await
            .map_err(CoreError::storage)?
            .map(Campaign::try_from)
            .transpose()
    }

    async fn set_campaign_active(&self, id: DbId, active: bool) -> Result<(), CoreError> {
        let updated = CampaignRepo::set_active(&self.pool, id, active)
            .await
            .map_err(CoreError::storage)?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "campaign",
                id,
            });
        }
        Ok(())
    }

    async fn list_expired_active(&self, now: Timestamp) -> Result<Vec<Campaign>, CoreError> {
        let rows = CampaignRepo::list_expired_active(&self.pool, now)
            .await
            .map_err(CoreError::storage)?;
        to_campaigns(rows)
    }

    async fn list_running_free_shipping(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Campaign>, CoreError> {
        let rows = CampaignRepo::list_running_free_shipping(&self.pool, now)
            .await
            .map_err(CoreError::storage)?;
        to_campaigns(rows)
    }

    async fn delete_campaign(&self, id: DbId) -> Result<bool, CoreError> {
        CampaignRepo::delete(&self.pool, id)
            .await
            .map_err(CoreError::storage)
    }
}

impl ProductPriceStore for PgStore {
    async fn list_target_products(
        &self,
        target: &ProductTarget,
    ) -> Result<Vec<ProductPrice>, CoreError> {
        let rows = match target {
            ProductTarget::All => ProductRepo::list_all_prices(&self.pool).await,
            ProductTarget::Categories(ids) => {
                ProductRepo::list_prices_by_categories(&self.pool, ids).await
            }
            ProductTarget::Products(ids) => ProductRepo::list_prices_by_ids(&self.pool, ids).await,
            ProductTarget::None => return Ok(Vec::new()),
        }
        .map_err(CoreError::storage)?;
        Ok(rows.into_iter().map(ProductPrice::from).collect())
    }

    async fn products_for_campaign(&self, campaign_id: DbId) -> Result<Vec<DbId>, CoreError> {
        ProductRepo::ids_for_campaign(&self.pool, campaign_id)
            .await
            .map_err(CoreError::storage)
    }

    async fn apply_sale_price(
        &self,
        product_id: DbId,
        sale_price: Decimal,
        campaign_id: DbId,
    ) -> Result<(), CoreError> {
        let updated = ProductRepo::apply_sale_price(&self.pool, product_id, sale_price, campaign_id)
            .await
            .map_err(CoreError::storage)?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "product",
                id: product_id,
            });
        }
        Ok(())
    }

    async fn clear_sale_price(&self, product_id: DbId) -> Result<(), CoreError> {
        ProductRepo::clear_sale_price(&self.pool, product_id)
            .await
            .map_err(CoreError::storage)?;
        Ok(())
    }
}

impl CartStore for PgStore {
    async fn mark_idle_abandoned(&self, cutoff: Timestamp) -> Result<u64, CoreError> {
        CartRepo::mark_idle_abandoned(&self.pool, cutoff)
            .await
            .map_err(CoreError::storage)
    }

    async fn load_snapshot(&self, cart_id: DbId) -> Result<Option<CartSnapshot>, CoreError> {
        let Some(header) = CartRepo::find_recipient(&self.pool, cart_id)
            .await
            .map_err(CoreError::storage)?
        else {
            return Ok(None);
        };
        let items = CartRepo::list_items(&self.pool, cart_id)
            .await
            .map_err(CoreError::storage)?;

        Ok(Some(CartSnapshot {
            id: header.id,
            status: header.status.parse()?,
            email: header.email,
            user_email: header.user_email,
            total: header.total,
            updated_at: header.updated_at,
            lines: items.into_iter().map(CartLine::from).collect(),
        }))
    }
}

impl MailLogStore for PgStore {
    async fn last_sent_since(
        &self,
        email: &str,
        mail_type: &str,
        since: Timestamp,
    ) -> Result<Option<Timestamp>, CoreError> {
        MailLogRepo::last_sent_since(&self.pool, email, mail_type, since)
            .await
            .map_err(CoreError::storage)
    }

    async fn record_sent(
        &self,
        email: &str,
        mail_type: &str,
        sent_at: Timestamp,
    ) -> Result<(), CoreError> {
        MailLogRepo::record(&self.pool, email, mail_type, sent_at)
            .await
            .map_err(CoreError::storage)?;
        Ok(())
    }
}

impl SettingsStore for PgStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, CoreError> {
        let setting = SettingRepo::get(&self.pool, key)
            .await
            .map_err(CoreError::storage)?;
        Ok(setting.map(|s| s.value))
    }
}
