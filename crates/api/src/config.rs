use std::str::FromStr;

use rust_decimal::Decimal;

use crate::auth::jwt::JwtConfig;

/// Default flat shipping fee in lira when `FLAT_SHIPPING_FEE` is not set.
const DEFAULT_FLAT_SHIPPING_FEE: &str = "49.90";

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except
/// `JWT_SECRET`, which must be set.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Shared secret expected as `Bearer` token on `/cron/*`. Cron
    /// endpoints reject every call while unset.
    pub cron_secret: Option<String>,
    /// Shipping fee charged when no free-shipping rule matches.
    pub flat_shipping_fee: Decimal,
    /// Period of the in-process maintenance loop; `None` disables it.
    pub maintenance_interval_secs: Option<u64>,
    /// JWT validation settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                    |
    /// | `CRON_SECRET`               | unset (cron disabled)   |
    /// | `FLAT_SHIPPING_FEE`         | `49.90`                 |
    /// | `MAINTENANCE_INTERVAL_SECS` | unset (loop disabled)   |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let cron_secret = std::env::var("CRON_SECRET")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let flat_shipping_fee = Decimal::from_str(
            &std::env::var("FLAT_SHIPPING_FEE")
                .unwrap_or_else(|_| DEFAULT_FLAT_SHIPPING_FEE.into()),
        )
        .expect("FLAT_SHIPPING_FEE must be a decimal amount");
        assert!(
            flat_shipping_fee >= Decimal::ZERO,
            "FLAT_SHIPPING_FEE must not be negative"
        );

        let maintenance_interval_secs = std::env::var("MAINTENANCE_INTERVAL_SECS")
            .ok()
            .map(|v| {
                v.parse::<u64>()
                    .expect("MAINTENANCE_INTERVAL_SECS must be a valid u64")
            })
            .filter(|secs| *secs > 0);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            cron_secret,
            flat_shipping_fee,
            maintenance_interval_secs,
            jwt,
        }
    }
}
