//! Admin campaign management.
//!
//! Activation and deactivation rewrite product sale prices through
//! [`CampaignLifecycle`]; plain edits never touch products unless the
//! campaign is active, in which case prices are re-applied.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use dukkan_core::campaign::{validate_campaign, CampaignDraft};
use dukkan_core::error::CoreError;
use dukkan_core::lifecycle::{CampaignLifecycle, PriceUpdateReport};
use dukkan_core::types::DbId;
use dukkan_db::models::campaign::CampaignRow;
use dukkan_db::repositories::CampaignRepo;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CampaignListParams {
    #[serde(default)]
    pub active_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A campaign together with the product price update it triggered.
#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub campaign: CampaignRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_update: Option<PriceUpdateReport>,
}

async fn load_row(pool: &PgPool, id: DbId) -> AppResult<CampaignRow> {
    CampaignRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "campaign",
            id,
        }))
}

/// GET /api/v1/admin/campaigns
pub async fn list_campaigns(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<CampaignListParams>,
) -> AppResult<impl IntoResponse> {
    let campaigns = CampaignRepo::list(
        &state.pool,
        params.active_only,
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// POST /api/v1/admin/campaigns
///
/// The row is inserted inactive; `is_active: true` in the body runs a full
/// activation afterwards.
pub async fn create_campaign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CampaignDraft>,
) -> AppResult<impl IntoResponse> {
    let mut draft = validate_campaign(&input)?;
    let activate = draft.is_active;
    draft.is_active = false;

    let row = CampaignRepo::create(&state.pool, &draft).await?;
    tracing::info!(
        campaign_id = row.id,
        campaign_type = %row.campaign_type,
        scope = %row.scope,
        user_id = admin.user_id,
        "Campaign created",
    );

    let price_update = if activate {
        Some(CampaignLifecycle::new(&state.store).activate(row.id).await?)
    } else {
        None
    };
    let campaign = load_row(&state.pool, row.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CampaignResponse {
                campaign,
                price_update,
            },
        }),
    ))
}

/// GET /api/v1/admin/campaigns/{id}
pub async fn get_campaign(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = load_row(&state.pool, id).await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// PUT /api/v1/admin/campaigns/{id}
///
/// Replace the editable fields. The active flag in the body is ignored; an
/// active campaign has its product prices recomputed from the new values.
pub async fn update_campaign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CampaignDraft>,
) -> AppResult<impl IntoResponse> {
    let draft = validate_campaign(&input)?;

    // Products are left alone until the row update has succeeded.
    let updated = CampaignRepo::update(&state.pool, id, &draft)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "campaign",
            id,
        }))?;

    let price_update = if updated.is_active {
        Some(CampaignLifecycle::new(&state.store).reprice(id).await?)
    } else {
        None
    };
    let campaign = load_row(&state.pool, id).await?;

    tracing::info!(campaign_id = id, user_id = admin.user_id, "Campaign updated");
    Ok(Json(DataResponse {
        data: CampaignResponse {
            campaign,
            price_update,
        },
    }))
}

/// DELETE /api/v1/admin/campaigns/{id}
///
/// Clears product back-references first. Returns the clearing report.
pub async fn delete_campaign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = CampaignLifecycle::new(&state.store).delete(id).await?;
    tracing::info!(campaign_id = id, user_id = admin.user_id, "Campaign removed by admin");
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/admin/campaigns/{id}/activate
pub async fn activate_campaign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = CampaignLifecycle::new(&state.store).activate(id).await?;
    if !report.is_complete() {
        tracing::warn!(
            campaign_id = id,
            failed = ?report.failed,
            user_id = admin.user_id,
            "Campaign activated with failed product updates",
        );
    }
    let campaign = load_row(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CampaignResponse {
            campaign,
            price_update: Some(report),
        },
    }))
}

/// POST /api/v1/admin/campaigns/{id}/deactivate
pub async fn deactivate_campaign(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = CampaignLifecycle::new(&state.store).deactivate(id).await?;
    let campaign = load_row(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CampaignResponse {
            campaign,
            price_update: Some(report),
        },
    }))
}
