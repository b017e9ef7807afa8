//! Free-shipping threshold resolver.
//!
//! Rules are tried in order and the first match wins:
//!
//! 1. the global `free_shipping_min_amount` setting, when it parses to a
//!    positive amount and the cart total reaches it;
//! 2. running FREE_SHIPPING campaigns. CART scope needs a `min_amount` and is
//!    skipped without one; ALL scope uses `min_amount` as a threshold when
//!    present and applies unconditionally otherwise;
//! 3. otherwise shipping is charged.
//!
//! [`ShippingResolver`] fails closed: a lookup error never grants free
//! shipping.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::campaign::{Campaign, CampaignScope, CampaignType};
use crate::money::parse_positive_amount;
use crate::ports::{CampaignStore, SettingsStore};
use crate::types::{DbId, Timestamp};

/// Settings key holding the global free-shipping minimum.
pub const FREE_SHIPPING_MIN_AMOUNT_KEY: &str = "free_shipping_min_amount";

/// The rule that granted free shipping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ShippingRule {
    GlobalMinimum { minimum: Decimal },
    CampaignThreshold { campaign_id: DbId, minimum: Decimal },
    CampaignUnconditional { campaign_id: DbId },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingDecision {
    pub free_shipping: bool,
    pub matched: Option<ShippingRule>,
}

impl ShippingDecision {
    pub fn charged() -> Self {
        Self {
            free_shipping: false,
            matched: None,
        }
    }

    fn free(rule: ShippingRule) -> Self {
        Self {
            free_shipping: true,
            matched: Some(rule),
        }
    }

    /// Shipping fee to charge given the flat fee.
    pub fn shipping_fee(&self, flat_fee: Decimal) -> Decimal {
        if self.free_shipping {
            Decimal::ZERO
        } else {
            flat_fee
        }
    }
}

fn campaign_rule(campaign: &Campaign, cart_total: Decimal, now: Timestamp) -> Option<ShippingRule> {
    if campaign.campaign_type != CampaignType::FreeShipping || !campaign.is_running(now) {
        return None;
    }
    match (campaign.scope, campaign.min_amount) {
        (CampaignScope::Cart | CampaignScope::All, Some(minimum)) if cart_total >= minimum => {
            Some(ShippingRule::CampaignThreshold {
                campaign_id: campaign.id,
                minimum,
            })
        }
        (CampaignScope::All, None) => Some(ShippingRule::CampaignUnconditional {
            campaign_id: campaign.id,
        }),
        _ => None,
    }
}

/// Decide whether `cart_total` ships free.
///
/// `global_min_setting` is the raw setting value; anything that does not parse
/// to a positive amount disables the global rule.
pub fn resolve_free_shipping(
    cart_total: Decimal,
    global_min_setting: Option<&str>,
    campaigns: &[Campaign],
    now: Timestamp,
) -> ShippingDecision {
    if let Some(minimum) = global_min_setting.and_then(parse_positive_amount) {
        if cart_total >= minimum {
            return ShippingDecision::free(ShippingRule::GlobalMinimum { minimum });
        }
    }

    campaigns
        .iter()
        .find_map(|c| campaign_rule(c, cart_total, now))
        .map(ShippingDecision::free)
        .unwrap_or_else(ShippingDecision::charged)
}

/// Loads the setting and running campaigns, then applies
/// [`resolve_free_shipping`].
pub struct ShippingResolver<'a, S> {
    store: &'a S,
}

impl<'a, S: SettingsStore + CampaignStore> ShippingResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, cart_total: Decimal, now: Timestamp) -> ShippingDecision {
        let setting = match self.store.get_setting(FREE_SHIPPING_MIN_AMOUNT_KEY).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Free shipping setting lookup failed, charging shipping");
                return ShippingDecision::charged();
            }
        };

        if let Some(minimum) = setting.as_deref().and_then(parse_positive_amount) {
            if cart_total >= minimum {
                return ShippingDecision::free(ShippingRule::GlobalMinimum { minimum });
            }
        }

        let campaigns = match self.store.list_running_free_shipping(now).await {
            Ok(campaigns) => campaigns,
            Err(e) => {
                tracing::warn!(error = %e, "Free shipping campaign lookup failed, charging shipping");
                return ShippingDecision::charged();
            }
        };

        let decision = resolve_free_shipping(cart_total, setting.as_deref(), &campaigns, now);
        tracing::debug!(
            cart_total = %cart_total,
            free_shipping = decision.free_shipping,
            matched = ?decision.matched,
            "Resolved shipping",
        );
        decision
    }
}
