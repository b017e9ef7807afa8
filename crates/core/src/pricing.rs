//! Campaign price evaluator.
//!
//! Pure functions mapping a base price (or a cart total) and a discount rule to
//! a discounted amount. No I/O; the lifecycle manager persists the results.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::campaign::CampaignType;
use crate::error::CoreError;
use crate::money::round_currency;
use crate::types::DbId;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// The price-affecting part of a campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountRule {
    pub campaign_type: CampaignType,
    /// Percent for `Percentage`, lira for `Fixed`, ignored for `FreeShipping`.
    pub value: Decimal,
    /// Upper bound on the discount amount, in lira.
    pub max_discount: Option<Decimal>,
}

/// Price fields of a product as seen by the lifecycle manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPrice {
    pub id: DbId,
    pub category_id: Option<DbId>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub active_campaign_id: Option<DbId>,
}

impl ProductPrice {
    /// The price a shopper pays: the sale price when one is set.
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }
}

fn validate_rule(rule: &DiscountRule) -> Result<(), CoreError> {
    if rule.value < Decimal::ZERO {
        return Err(CoreError::InvalidArgument(format!(
            "discount value must not be negative, got {}",
            rule.value
        )));
    }
    if rule.campaign_type == CampaignType::Percentage && rule.value > ONE_HUNDRED {
        return Err(CoreError::InvalidArgument(format!(
            "percentage discount must be at most 100, got {}",
            rule.value
        )));
    }
    if let Some(cap) = rule.max_discount {
        if cap < Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "max discount must not be negative, got {cap}"
            )));
        }
    }
    Ok(())
}

/// Discount amount before rounding, capped by `max_discount`.
///
/// # Errors
///
/// `InvalidArgument` if the percentage calculation overflows.
fn raw_discount(amount: Decimal, rule: &DiscountRule) -> Result<Decimal, CoreError> {
    let discount = match rule.campaign_type {
        CampaignType::Percentage => amount
            .checked_mul(rule.value)
            .and_then(|scaled| scaled.checked_div(ONE_HUNDRED))
            .ok_or_else(|| {
                CoreError::InvalidArgument(format!(
                    "amount {amount} is too large to discount by {}%",
                    rule.value
                ))
            })?,
        CampaignType::Fixed => rule.value.min(amount),
        CampaignType::FreeShipping => Decimal::ZERO,
    };
    Ok(match rule.max_discount {
        Some(cap) if discount > cap => cap,
        _ => discount,
    })
}

/// Compute a product's sale price under `rule`.
///
/// Returns `Ok(None)` for free-shipping campaigns, which never touch product
/// prices. The result is rounded to kuruş, never negative and never above
/// `base_price`.
///
/// # Errors
///
/// `InvalidArgument` if `base_price <= 0`, the discount value is negative, a
/// percentage exceeds 100, `max_discount` is negative, or the amount is too
/// large to discount without overflow.
pub fn compute_sale_price(
    base_price: Decimal,
    rule: &DiscountRule,
) -> Result<Option<Decimal>, CoreError> {
    if base_price <= Decimal::ZERO {
        return Err(CoreError::InvalidArgument(format!(
            "base price must be positive, got {base_price}"
        )));
    }
    validate_rule(rule)?;

    if rule.campaign_type == CampaignType::FreeShipping {
        return Ok(None);
    }

    let sale = round_currency(base_price - raw_discount(base_price, rule)?);
    Ok(Some(sale.clamp(Decimal::ZERO, base_price)))
}

/// Compute the discount a cart-level coupon takes off `cart_total`.
///
/// Uses the same formula and cap as [`compute_sale_price`]; the result is the
/// discount amount, not the discounted total.
pub fn cart_discount(cart_total: Decimal, rule: &DiscountRule) -> Result<Decimal, CoreError> {
    if cart_total < Decimal::ZERO {
        return Err(CoreError::InvalidArgument(format!(
            "cart total must not be negative, got {cart_total}"
        )));
    }
    validate_rule(rule)?;
    Ok(round_currency(raw_discount(cart_total, rule)?).clamp(Decimal::ZERO, cart_total))
}
