//! Campaign domain types, draft validation and coupon checks.
//!
//! A campaign is a time-bounded promotion. Its `campaign_type` decides what
//! the `value` means and its `scope` decides what it targets. Targets are
//! stored as comma-joined id lists (`"3,7,12"`).

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::pricing::{cart_discount, DiscountRule};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignType {
    Percentage,
    Fixed,
    FreeShipping,
}

impl CampaignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "PERCENTAGE",
            Self::Fixed => "FIXED",
            Self::FreeShipping => "FREE_SHIPPING",
        }
    }
}

impl FromStr for CampaignType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERCENTAGE" => Ok(Self::Percentage),
            "FIXED" => Ok(Self::Fixed),
            "FREE_SHIPPING" => Ok(Self::FreeShipping),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown campaign type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignScope {
    All,
    Category,
    Product,
    Cart,
}

impl CampaignScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Category => "CATEGORY",
            Self::Product => "PRODUCT",
            Self::Cart => "CART",
        }
    }
}

impl FromStr for CampaignScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(Self::All),
            "CATEGORY" => Ok(Self::Category),
            "PRODUCT" => Ok(Self::Product),
            "CART" => Ok(Self::Cart),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown campaign scope '{other}'"
            ))),
        }
    }
}

impl fmt::Display for CampaignScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which products a campaign's price effect lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductTarget {
    /// Every product in the catalog.
    All,
    /// Products whose category id is in the list.
    Categories(Vec<DbId>),
    /// Products whose id is in the list.
    Products(Vec<DbId>),
    /// Cart-level campaigns target no product.
    None,
}

/// A persisted campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub campaign_type: CampaignType,
    pub scope: CampaignScope,
    pub value: Decimal,
    pub code: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_discount: Option<Decimal>,
    pub target_categories: Vec<DbId>,
    pub target_products: Vec<DbId>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub is_active: bool,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

impl Campaign {
    pub fn discount_rule(&self) -> DiscountRule {
        DiscountRule {
            campaign_type: self.campaign_type,
            value: self.value,
            max_discount: self.max_discount,
        }
    }

    pub fn product_target(&self) -> ProductTarget {
        match self.scope {
            CampaignScope::All => ProductTarget::All,
            CampaignScope::Category => ProductTarget::Categories(self.target_categories.clone()),
            CampaignScope::Product => ProductTarget::Products(self.target_products.clone()),
            CampaignScope::Cart => ProductTarget::None,
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.end_date < now
    }

    /// Active, started and not yet expired.
    pub fn is_running(&self, now: Timestamp) -> bool {
        self.is_active && self.start_date <= now && !self.is_expired(now)
    }

    pub fn usage_exhausted(&self) -> bool {
        matches!(self.usage_limit, Some(limit) if self.usage_count >= limit)
    }
}

/// Parse a comma-joined id list, skipping blank and non-numeric fragments.
pub fn parse_id_list(raw: Option<&str>) -> Vec<DbId> {
    raw.map(|s| {
        s.split(',')
            .filter_map(|part| part.trim().parse::<DbId>().ok())
            .collect()
    })
    .unwrap_or_default()
}

/// Join ids into the stored comma-joined form; `None` for an empty list.
pub fn join_id_list(ids: &[DbId]) -> Option<String> {
    if ids.is_empty() {
        return None;
    }
    Some(
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Normalize a coupon code: trimmed, upper-cased, `None` when blank.
pub fn normalize_code(raw: Option<&str>) -> Option<String> {
    raw.map(|c| c.trim().to_uppercase()).filter(|c| !c.is_empty())
}

/// Create/update payload for a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub title: String,
    pub description: Option<String>,
    pub campaign_type: CampaignType,
    pub scope: CampaignScope,
    #[serde(default)]
    pub value: Decimal,
    pub code: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_discount: Option<Decimal>,
    #[serde(default)]
    pub target_categories: Vec<DbId>,
    #[serde(default)]
    pub target_products: Vec<DbId>,
    pub usage_limit: Option<i32>,
    #[serde(default)]
    pub is_active: bool,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::InvalidArgument(msg.into())
}

/// Validate a draft and return its normalized form.
///
/// Normalization trims the title, upper-cases the code and zeroes `value` for
/// free-shipping campaigns. A CART-scope free-shipping campaign without
/// `min_amount` is accepted; the shipping resolver never matches it.
pub fn validate_campaign(draft: &CampaignDraft) -> Result<CampaignDraft, CoreError> {
    let mut out = draft.clone();
    out.title = draft.title.trim().to_string();
    out.code = normalize_code(draft.code.as_deref());
    out.description = draft
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    if out.title.is_empty() {
        return Err(invalid("title must not be empty"));
    }
    if out.value < Decimal::ZERO {
        return Err(invalid("value must not be negative"));
    }
    if out.campaign_type == CampaignType::Percentage && out.value > Decimal::ONE_HUNDRED {
        return Err(invalid("percentage value must be at most 100"));
    }
    if out.campaign_type == CampaignType::FreeShipping {
        out.value = Decimal::ZERO;
    }
    if out.end_date <= out.start_date {
        return Err(invalid("end_date must be after start_date"));
    }
    if matches!(out.min_amount, Some(m) if m < Decimal::ZERO) {
        return Err(invalid("min_amount must not be negative"));
    }
    if matches!(out.max_discount, Some(m) if m < Decimal::ZERO) {
        return Err(invalid("max_discount must not be negative"));
    }
    if matches!(out.usage_limit, Some(l) if l < 0) {
        return Err(invalid("usage_limit must not be negative"));
    }

    match out.scope {
        CampaignScope::Category if out.target_categories.is_empty() => {
            return Err(invalid("CATEGORY scope requires target_categories"));
        }
        CampaignScope::Product if out.target_products.is_empty() => {
            return Err(invalid("PRODUCT scope requires target_products"));
        }
        CampaignScope::Cart
            if out.campaign_type != CampaignType::FreeShipping && out.min_amount.is_none() =>
        {
            return Err(invalid("CART scope discounts require min_amount"));
        }
        _ => {}
    }

    Ok(out)
}

/// Outcome of checking a coupon code against a cart total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouponQuote {
    pub campaign_id: DbId,
    pub code: String,
    pub discount: Decimal,
    pub free_shipping: bool,
}

/// Check whether `campaign` (looked up by code) applies to `cart_total` now.
///
/// Percentage and fixed coupons only apply at CART or ALL scope; narrower
/// scopes are already reflected in product sale prices.
pub fn check_coupon(
    campaign: &Campaign,
    cart_total: Decimal,
    now: Timestamp,
) -> Result<CouponQuote, CoreError> {
    let code = campaign.code.clone().unwrap_or_default();

    if !campaign.is_active {
        return Err(invalid(format!("coupon {code} is not active")));
    }
    if now < campaign.start_date {
        return Err(invalid(format!("coupon {code} has not started yet")));
    }
    if campaign.is_expired(now) {
        return Err(invalid(format!("coupon {code} has expired")));
    }
    if campaign.usage_exhausted() {
        return Err(invalid(format!("coupon {code} usage limit reached")));
    }
    if let Some(min) = campaign.min_amount {
        if cart_total < min {
            return Err(invalid(format!(
                "coupon {code} requires a cart total of at least {min}"
            )));
        }
    }

    let free_shipping = campaign.campaign_type == CampaignType::FreeShipping;
    let discount = if free_shipping {
        Decimal::ZERO
    } else {
        if !matches!(campaign.scope, CampaignScope::Cart | CampaignScope::All) {
            return Err(invalid(format!(
                "coupon {code} is applied to product prices automatically"
            )));
        }
        cart_discount(cart_total, &campaign.discount_rule())?
    };

    Ok(CouponQuote {
        campaign_id: campaign.id,
        code,
        discount,
        free_shipping,
    })
}
