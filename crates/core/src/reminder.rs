//! Cart reminder request types and the per-recipient cooldown rule.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// `mail_logs.mail_type` value for cart reminders.
pub const MAIL_TYPE_CART_REMINDER: &str = "cart_reminder";

/// Minimum gap between two reminders to the same recipient.
pub const REMINDER_COOLDOWN_HOURS: i64 = 24;

pub fn reminder_cooldown() -> Duration {
    Duration::hours(REMINDER_COOLDOWN_HOURS)
}

/// Mail log key for a recipient. Addresses differing only in case or
/// surrounding whitespace share one cooldown.
pub fn recipient_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Start of the cooldown window ending at `now`.
pub fn cooldown_window_start(now: Timestamp) -> Timestamp {
    now - reminder_cooldown()
}

/// Fail with `RateLimited` when `last_sent` falls inside the cooldown window.
pub fn ensure_cooldown_elapsed(
    last_sent: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), CoreError> {
    match last_sent {
        Some(sent_at) if sent_at > cooldown_window_start(now) => {
            let retry_after = (sent_at + reminder_cooldown() - now).num_seconds().max(1);
            Err(CoreError::RateLimited {
                retry_after_secs: retry_after,
            })
        }
        _ => Ok(()),
    }
}

/// Admin-supplied parameters for a single reminder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderRequest {
    #[serde(default)]
    pub cart_id: DbId,
    pub discount_code: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Result of a delivered reminder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderReceipt {
    pub cart_id: DbId,
    pub email: String,
    pub subject: String,
    pub sent_at: Timestamp,
}
