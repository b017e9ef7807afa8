use std::sync::Arc;

use dukkan_db::PgStore;
use dukkan_events::SmtpMailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: dukkan_db::DbPool,
    /// Pool-backed implementation of the core store traits.
    pub store: PgStore,
    pub config: Arc<ServerConfig>,
    /// `None` when `SMTP_HOST` is not configured.
    pub mailer: Option<Arc<SmtpMailer>>,
}

impl AppState {
    pub fn new(
        pool: dukkan_db::DbPool,
        config: ServerConfig,
        mailer: Option<SmtpMailer>,
    ) -> Self {
        Self {
            store: PgStore::new(pool.clone()),
            pool,
            config: Arc::new(config),
            mailer: mailer.map(Arc::new),
        }
    }
}
