//! Repository for the append-only `mail_logs` table.

use dukkan_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::mail_log::MailLog;

pub struct MailLogRepo;

impl MailLogRepo {
    /// Latest `sent_at` for `(email, mail_type)` strictly after `since`.
    ///
    /// Emails are compared case-insensitively; [`MailLogRepo::record`] stores
    /// them lowercased.
    pub async fn last_sent_since(
        pool: &PgPool,
        email: &str,
        mail_type: &str,
        since: Timestamp,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<Timestamp>>(
            "SELECT MAX(sent_at) FROM mail_logs \
             WHERE email = LOWER(TRIM($1)) AND mail_type = $2 AND sent_at > $3",
        )
        .bind(email)
        .bind(mail_type)
        .bind(since)
        .fetch_one(pool)
        .await
    }

    pub async fn record(
        pool: &PgPool,
        email: &str,
        mail_type: &str,
        sent_at: Timestamp,
    ) -> Result<MailLog, sqlx::Error> {
        sqlx::query_as::<_, MailLog>(
            "INSERT INTO mail_logs (email, mail_type, sent_at) \
             VALUES (LOWER(TRIM($1)), $2, $3) \
             RETURNING id, email, mail_type, sent_at",
        )
        .bind(email)
        .bind(mail_type)
        .bind(sent_at)
        .fetch_one(pool)
        .await
    }
}
