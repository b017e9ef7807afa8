use dukkan_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `mail_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MailLog {
    pub id: DbId,
    pub email: String,
    pub mail_type: String,
    pub sent_at: Timestamp,
}
