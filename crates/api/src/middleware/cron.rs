//! Shared-secret guard for scheduler-invoked endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use dukkan_core::error::CoreError;

use super::bearer_token;
use crate::error::AppError;
use crate::state::AppState;

/// Accepts requests whose Bearer token equals `CRON_SECRET`.
///
/// Every request is rejected with 401 while no secret is configured.
pub struct CronAuth;

impl FromRequestParts<AppState> for CronAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(secret) = state.config.cron_secret.as_deref() else {
            tracing::warn!("Cron endpoint called but CRON_SECRET is not configured");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Cron endpoints are disabled".into(),
            )));
        };

        let token = bearer_token(parts)?;
        if !constant_time_eq(token.as_bytes(), secret.as_bytes()) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid cron secret".into(),
            )));
        }
        Ok(CronAuth)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
