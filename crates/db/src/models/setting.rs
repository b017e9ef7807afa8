use dukkan_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `settings` key-value table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: Timestamp,
}

/// Body of `PUT /admin/settings/{key}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertSetting {
    pub value: String,
}
