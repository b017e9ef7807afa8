//! Cart status state machine and abandonment detection.
//!
//! The only transition managed here is ACTIVE -> ABANDONED, taken once a cart
//! has been idle for [`ABANDONMENT_THRESHOLD_MINUTES`]. Detection looks at
//! `updated_at` only; an idle empty cart is abandoned like a full one.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::round_currency;
use crate::ports::CartStore;
use crate::types::{DbId, Timestamp};

/// Idle time after which an ACTIVE cart counts as abandoned.
pub const ABANDONMENT_THRESHOLD_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartStatus {
    Active,
    Abandoned,
    Ordered,
}

impl CartStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Abandoned => "ABANDONED",
            Self::Ordered => "ORDERED",
        }
    }
}

impl FromStr for CartStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "ABANDONED" => Ok(Self::Abandoned),
            "ORDERED" => Ok(Self::Ordered),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown cart status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for CartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn abandonment_threshold() -> Duration {
    Duration::minutes(ABANDONMENT_THRESHOLD_MINUTES)
}

/// Carts last updated at or before this instant are idle.
pub fn abandonment_cutoff(now: Timestamp) -> Timestamp {
    now - abandonment_threshold()
}

/// `now - updated_at >= threshold`.
pub fn is_idle(updated_at: Timestamp, now: Timestamp) -> bool {
    updated_at <= abandonment_cutoff(now)
}

/// One line of a cart as rendered in a reminder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub product_id: DbId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        round_currency(self.unit_price * Decimal::from(self.quantity))
    }
}

/// Sum of line totals.
pub fn lines_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// A cart with its owner's contact details and lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSnapshot {
    pub id: DbId,
    pub status: CartStatus,
    /// Email captured on the cart itself (guest checkout).
    pub email: Option<String>,
    /// Email of the owning user account, if any.
    pub user_email: Option<String>,
    pub total: Decimal,
    pub updated_at: Timestamp,
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Resolve the reminder recipient: the cart email, else the user email.
    pub fn recipient(&self) -> Result<&str, CoreError> {
        [self.email.as_deref(), self.user_email.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|e| !e.is_empty())
            .ok_or(CoreError::MissingRecipient { cart_id: self.id })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() || self.total <= Decimal::ZERO
    }
}

/// Periodic ACTIVE -> ABANDONED sweep.
pub struct AbandonmentDetector<'a, S> {
    store: &'a S,
}

impl<'a, S: CartStore> AbandonmentDetector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Mark every idle ACTIVE cart as ABANDONED and return how many flipped.
    ///
    /// Re-running without new idle carts affects nothing.
    pub async fn sweep(&self, now: Timestamp) -> Result<u64, CoreError> {
        let cutoff = abandonment_cutoff(now);
        let affected = self.store.mark_idle_abandoned(cutoff).await?;
        if affected > 0 {
            tracing::info!(affected, cutoff = %cutoff, "Marked idle carts as abandoned");
        } else {
            tracing::debug!(cutoff = %cutoff, "No idle carts to abandon");
        }
        Ok(affected)
    }
}
