//! Campaign lifecycle: activation, deactivation, expiry and deletion.
//!
//! Product writes are best-effort. A failing product is logged and counted in
//! the [`PriceUpdateReport`], never retried and never rolled back, and the
//! campaign flag is flipped regardless.

use serde::Serialize;

use crate::campaign::{Campaign, CampaignType};
use crate::error::CoreError;
use crate::ports::{CampaignStore, ProductPriceStore};
use crate::pricing::compute_sale_price;
use crate::types::{DbId, Timestamp};

/// Outcome of a bulk product price update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceUpdateReport {
    pub campaign_id: DbId,
    /// Products selected by the campaign scope.
    pub targeted: usize,
    /// Products whose price fields were written.
    pub updated: usize,
    /// Products whose write failed.
    pub failed: Vec<DbId>,
}

impl PriceUpdateReport {
    fn new(campaign_id: DbId) -> Self {
        Self {
            campaign_id,
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct CampaignLifecycle<'a, S> {
    store: &'a S,
}

impl<'a, S: CampaignStore + ProductPriceStore> CampaignLifecycle<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    async fn load(&self, id: DbId) -> Result<Campaign, CoreError> {
        self.store
            .find_campaign(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "campaign",
                id,
            })
    }

    /// Apply the campaign's sale price to every targeted product, then mark
    /// it active.
    pub async fn activate(&self, id: DbId) -> Result<PriceUpdateReport, CoreError> {
        let campaign = self.load(id).await?;
        let mut report = PriceUpdateReport::new(id);

        if campaign.campaign_type != CampaignType::FreeShipping {
            let rule = campaign.discount_rule();
            let products = self
                .store
                .list_target_products(&campaign.product_target())
                .await?;
            report.targeted = products.len();

            for product in products {
                let outcome = match compute_sale_price(product.price, &rule) {
                    Ok(Some(sale)) => self.store.apply_sale_price(product.id, sale, id).await,
                    Ok(None) => continue,
                    Err(e) => Err(e),
                };
                match outcome {
                    Ok(()) => report.updated += 1,
                    Err(e) => {
                        tracing::warn!(
                            campaign_id = id,
                            product_id = product.id,
                            error = %e,
                            "Failed to apply campaign price",
                        );
                        report.failed.push(product.id);
                    }
                }
            }
        }

        self.store.set_campaign_active(id, true).await?;
        tracing::info!(
            campaign_id = id,
            targeted = report.targeted,
            updated = report.updated,
            failed = report.failed.len(),
            "Campaign activated",
        );
        Ok(report)
    }

    /// Clear sale prices referencing the campaign, then mark it inactive.
    pub async fn deactivate(&self, id: DbId) -> Result<PriceUpdateReport, CoreError> {
        self.load(id).await?;
        let report = self.clear_products(id).await?;
        self.store.set_campaign_active(id, false).await?;
        tracing::info!(
            campaign_id = id,
            cleared = report.updated,
            failed = report.failed.len(),
            "Campaign deactivated",
        );
        Ok(report)
    }

    /// Re-apply an active campaign after its row was edited.
    ///
    /// Products still carrying the campaign are cleared through their
    /// back-reference first, so prices from the old scope never linger.
    pub async fn reprice(&self, id: DbId) -> Result<PriceUpdateReport, CoreError> {
        self.load(id).await?;
        let cleared = self.clear_products(id).await?;
        if !cleared.is_complete() {
            tracing::warn!(
                campaign_id = id,
                failed = cleared.failed.len(),
                "Some old campaign prices could not be cleared",
            );
        }
        self.activate(id).await
    }

    /// Deactivate every active campaign whose end date has passed.
    ///
    /// Returns the number of campaigns cleaned.
    pub async fn expiry_sweep(&self, now: Timestamp) -> Result<usize, CoreError> {
        let expired = self.store.list_expired_active(now).await?;
        let mut cleaned = 0;

        for campaign in expired {
            let report = self.clear_products(campaign.id).await?;
            self.store.set_campaign_active(campaign.id, false).await?;
            tracing::info!(
                campaign_id = campaign.id,
                cleared = report.updated,
                failed = report.failed.len(),
                "Expired campaign deactivated",
            );
            cleaned += 1;
        }

        Ok(cleaned)
    }

    /// Clear product back-references, then remove the campaign row.
    pub async fn delete(&self, id: DbId) -> Result<PriceUpdateReport, CoreError> {
        self.load(id).await?;
        let report = self.clear_products(id).await?;
        if !self.store.delete_campaign(id).await? {
            return Err(CoreError::NotFound {
                entity: "campaign",
                id,
            });
        }
        tracing::info!(campaign_id = id, cleared = report.updated, "Campaign deleted");
        Ok(report)
    }

    async fn clear_products(&self, campaign_id: DbId) -> Result<PriceUpdateReport, CoreError> {
        let product_ids = self.store.products_for_campaign(campaign_id).await?;
        let mut report = PriceUpdateReport::new(campaign_id);
        report.targeted = product_ids.len();

        for product_id in product_ids {
            match self.store.clear_sale_price(product_id).await {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    tracing::warn!(campaign_id, product_id, error = %e, "Failed to clear campaign price");
                    report.failed.push(product_id);
                }
            }
        }
        Ok(report)
    }
}
