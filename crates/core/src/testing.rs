//! In-memory store used by the service tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use rust_decimal::Decimal;

use crate::campaign::{Campaign, CampaignType, ProductTarget};
use crate::cart::{CartSnapshot, CartStatus};
use crate::error::CoreError;
use crate::ports::{CampaignStore, CartStore, ProductPriceStore, SettingsStore};
use crate::pricing::ProductPrice;
use crate::types::{DbId, Timestamp};

#[derive(Default)]
struct State {
    campaigns: BTreeMap<DbId, Campaign>,
    products: BTreeMap<DbId, ProductPrice>,
    carts: BTreeMap<DbId, CartSnapshot>,
    settings: HashMap<String, String>,
    failing_products: HashSet<DbId>,
    fail_reads: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn add_campaign(&self, campaign: Campaign) {
        self.with(|s| s.campaigns.insert(campaign.id, campaign));
    }

    pub fn campaign(&self, id: DbId) -> Campaign {
        self.find(id).expect("campaign exists")
    }

    pub fn find(&self, id: DbId) -> Option<Campaign> {
        self.with(|s| s.campaigns.get(&id).cloned())
    }

    pub fn add_product(&self, id: DbId, category_id: Option<DbId>, price: Decimal) {
        self.with(|s| {
            s.products.insert(
                id,
                ProductPrice {
                    id,
                    category_id,
                    price,
                    sale_price: None,
                    active_campaign_id: None,
                },
            )
        });
    }

    pub fn product(&self, id: DbId) -> ProductPrice {
        self.with(|s| s.products.get(&id).cloned()).expect("product exists")
    }

    pub fn products(&self) -> Vec<ProductPrice> {
        self.with(|s| s.products.values().cloned().collect())
    }

    pub fn fail_product_write(&self, id: DbId) {
        self.with(|s| s.failing_products.insert(id));
    }

    pub fn add_cart(
        &self,
        id: DbId,
        status: CartStatus,
        updated_at: Timestamp,
        email: Option<&str>,
    ) {
        self.with(|s| {
            s.carts.insert(
                id,
                CartSnapshot {
                    id,
                    status,
                    email: email.map(str::to_string),
                    user_email: None,
                    total: Decimal::ZERO,
                    updated_at,
                    lines: vec![],
                },
            )
        });
    }

    pub fn cart_status(&self, id: DbId) -> Option<CartStatus> {
        self.with(|s| s.carts.get(&id).map(|c| c.status))
    }

    pub fn put_setting(&self, key: &str, value: &str) {
        self.with(|s| s.settings.insert(key.to_string(), value.to_string()));
    }

    pub fn fail_reads(&self, fail: bool) {
        self.with(|s| s.fail_reads = fail);
    }

    fn check_reads(&self) -> Result<(), CoreError> {
        if self.with(|s| s.fail_reads) {
            return Err(CoreError::storage("connection refused"));
        }
        Ok(())
    }
}

impl CampaignStore for MemoryStore {
    async fn find_campaign(&self, id: DbId) -> Result<Option<Campaign>, CoreError> {
        self.check_reads()?;
        Ok(self.find(id))
    }

    async fn set_campaign_active(&self, id: DbId, active: bool) -> Result<(), CoreError> {
        self.with(|s| match s.campaigns.get_mut(&id) {
            Some(c) => {
                c.is_active = active;
                Ok(())
            }
            None => Err(CoreError::NotFound {
                entity: "campaign",
                id,
            }),
        })
    }

    async fn list_expired_active(&self, now: Timestamp) -> Result<Vec<Campaign>, CoreError> {
        self.check_reads()?;
        Ok(self.with(|s| {
            s.campaigns
                .values()
                .filter(|c| c.is_active && c.is_expired(now))
                .cloned()
                .collect()
        }))
    }

    async fn list_running_free_shipping(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Campaign>, CoreError> {
        self.check_reads()?;
        Ok(self.with(|s| {
            s.campaigns
                .values()
                .filter(|c| c.campaign_type == CampaignType::FreeShipping && c.is_running(now))
                .cloned()
                .collect()
        }))
    }

    async fn delete_campaign(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.with(|s| s.campaigns.remove(&id).is_some()))
    }
}

impl ProductPriceStore for MemoryStore {
    async fn list_target_products(
        &self,
        target: &ProductTarget,
    ) -> Result<Vec<ProductPrice>, CoreError> {
        self.check_reads()?;
        Ok(self.with(|s| {
            s.products
                .values()
                .filter(|p| match target {
                    ProductTarget::All => true,
                    ProductTarget::Categories(ids) => {
                        p.category_id.is_some_and(|c| ids.contains(&c))
                    }
                    ProductTarget::Products(ids) => ids.contains(&p.id),
                    ProductTarget::None => false,
                })
                .cloned()
                .collect()
        }))
    }

    async fn products_for_campaign(&self, campaign_id: DbId) -> Result<Vec<DbId>, CoreError> {
        self.check_reads()?;
        Ok(self.with(|s| {
            s.products
                .values()
                .filter(|p| p.active_campaign_id == Some(campaign_id))
                .map(|p| p.id)
                .collect()
        }))
    }

    async fn apply_sale_price(
        &self,
        product_id: DbId,
        sale_price: Decimal,
        campaign_id: DbId,
    ) -> Result<(), CoreError> {
        self.with(|s| {
            if s.failing_products.contains(&product_id) {
                return Err(CoreError::storage("write rejected"));
            }
            let p = s.products.get_mut(&product_id).ok_or(CoreError::NotFound {
                entity: "product",
                id: product_id,
            })?;
            p.sale_price = Some(sale_price);
            p.active_campaign_id = Some(campaign_id);
            Ok(())
        })
    }

    async fn clear_sale_price(&self, product_id: DbId) -> Result<(), CoreError> {
        self.with(|s| {
            if s.failing_products.contains(&product_id) {
                return Err(CoreError::storage("write rejected"));
            }
            if let Some(p) = s.products.get_mut(&product_id) {
                p.sale_price = None;
                p.active_campaign_id = None;
            }
            Ok(())
        })
    }
}

impl CartStore for MemoryStore {
    async fn mark_idle_abandoned(&self, cutoff: Timestamp) -> Result<u64, CoreError> {
        Ok(self.with(|s| {
            let mut affected = 0;
            for cart in s.carts.values_mut() {
                if cart.status == CartStatus::Active && cart.updated_at <= cutoff {
                    cart.status = CartStatus::Abandoned;
                    affected += 1;
                }
            }
            affected
        }))
    }

    async fn load_snapshot(&self, cart_id: DbId) -> Result<Option<CartSnapshot>, CoreError> {
        self.check_reads()?;
        Ok(self.with(|s| s.carts.get(&cart_id).cloned()))
    }
}

impl SettingsStore for MemoryStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.check_reads()?;
        Ok(self.with(|s| s.settings.get(key).cloned()))
    }
}
