//! Persistence and delivery seams consumed by the domain services.
//!
//! The `db` crate implements the store traits over PostgreSQL; the `events`
//! crate implements [`MailSender`] over SMTP. Services are generic over these
//! traits so they run unchanged against in-memory fakes in tests.

use std::future::Future;

use rust_decimal::Decimal;

use crate::campaign::{Campaign, ProductTarget};
use crate::cart::CartSnapshot;
use crate::error::CoreError;
use crate::pricing::ProductPrice;
use crate::types::{DbId, Timestamp};

/// Campaign rows.
pub trait CampaignStore: Send + Sync {
    fn find_campaign(
        &self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Campaign>, CoreError>> + Send;

    fn set_campaign_active(
        &self,
        id: DbId,
        active: bool,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Campaigns with `is_active = true AND end_date < now`.
    fn list_expired_active(
        &self,
        now: Timestamp,
    ) -> impl Future<Output = Result<Vec<Campaign>, CoreError>> + Send;

    /// Active FREE_SHIPPING campaigns that have started and not yet expired.
    fn list_running_free_shipping(
        &self,
        now: Timestamp,
    ) -> impl Future<Output = Result<Vec<Campaign>, CoreError>> + Send;

    /// Remove the campaign row. Returns `false` if it did not exist.
    fn delete_campaign(&self, id: DbId) -> impl Future<Output = Result<bool, CoreError>> + Send;
}

/// Product price fields (`price`, `sale_price`, `active_campaign_id`).
pub trait ProductPriceStore: Send + Sync {
    fn list_target_products(
        &self,
        target: &ProductTarget,
    ) -> impl Future<Output = Result<Vec<ProductPrice>, CoreError>> + Send;

    /// Ids of products whose `active_campaign_id` equals `campaign_id`.
    fn products_for_campaign(
        &self,
        campaign_id: DbId,
    ) -> impl Future<Output = Result<Vec<DbId>, CoreError>> + Send;

    fn apply_sale_price(
        &self,
        product_id: DbId,
        sale_price: Decimal,
        campaign_id: DbId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Reset `sale_price` and `active_campaign_id` to NULL.
    fn clear_sale_price(&self, product_id: DbId)
        -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Cart status and the reminder view of a cart.
pub trait CartStore: Send + Sync {
    /// Flip every ACTIVE cart last updated at or before `cutoff` to ABANDONED.
    fn mark_idle_abandoned(
        &self,
        cutoff: Timestamp,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn load_snapshot(
        &self,
        cart_id: DbId,
    ) -> impl Future<Output = Result<Option<CartSnapshot>, CoreError>> + Send;
}

/// Append-only log of sent notifications.
pub trait MailLogStore: Send + Sync {
    /// Most recent `sent_at` for `(email, mail_type)` strictly after `since`.
    fn last_sent_since(
        &self,
        email: &str,
        mail_type: &str,
        since: Timestamp,
    ) -> impl Future<Output = Result<Option<Timestamp>, CoreError>> + Send;

    fn record_sent(
        &self,
        email: &str,
        mail_type: &str,
        sent_at: Timestamp,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Read-only key-value settings.
pub trait SettingsStore: Send + Sync {
    fn get_setting(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, CoreError>> + Send;
}

/// A fully composed outbound email.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Transactional email collaborator. Failures surface as
/// [`CoreError::Delivery`] and are not interpreted.
pub trait MailSender: Send + Sync {
    fn send(&self, mail: &OutgoingMail) -> impl Future<Output = Result<(), CoreError>> + Send;
}
