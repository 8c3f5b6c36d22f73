/**
 * Seeding Route
 *
 * Re-provisions a site's starter content on demand. Requires a tenant
 * bearer token; the target site defaults to the token's own slug and
 * must belong to the calling tenant. The whole run is bounded by a
 * timeout so a wedged store cannot hold the request open forever.
 */

use std::time::Duration;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::require_claims;
use crate::error::AppError;
use crate::seed::templates::BusinessOverrides;
use crate::seed::seed_site;
use crate::server::state::AppState;
use crate::store::models::{SiteStatus, TenantStatus};

const SEED_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRequest {
    #[serde(default)]
    pub site_slug: Option<String>,
    /// Optional business facts woven into the starter content
    #[serde(default)]
    pub business: Option<BusinessOverrides>,
}

/// POST /api/seed
pub async fn seed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SeedRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = require_claims(&headers, &state.config.jwt_secret)?;

    let slug = request.site_slug.unwrap_or_else(|| claims.slug.clone());

    let site = state
        .store
        .find_site_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("site"))?;

    let tenant_id: Uuid = claims
        .sub
        .parse()
        .map_err(|_| AppError::unauthorized("Invalid token subject"))?;
    if site.tenant_id != tenant_id {
        return Err(AppError::unauthorized(
            "Site does not belong to this tenant",
        ));
    }

    // Lifecycle gate: nothing is purged or written for a suspended
    // tenant or a suspended/archived site. Pending tenants stay
    // seedable so half-provisioned registrations can be retried.
    let tenant = state
        .store
        .find_tenant_by_slug(&claims.slug)
        .await?
        .ok_or_else(|| AppError::not_found("tenant"))?;
    if tenant.status == TenantStatus::Suspended {
        return Err(AppError::unauthorized("Tenant is suspended"));
    }
    if matches!(site.status, SiteStatus::Suspended | SiteStatus::Archived) {
        return Err(AppError::unauthorized("Site is not active"));
    }

    let business = request.business.unwrap_or_default();
    let report = tokio::time::timeout(
        SEED_TIMEOUT,
        seed_site(&state.store, &site, state.config.addressing_mode, &business),
    )
    .await
    .map_err(|_| AppError::internal("Seeding timed out"))??;

    state.dispatcher.apply(&report.invalidations);

    Ok(Json(json!({
        "success": true,
        "site": site.slug,
        "pages": report.pages_created,
        "posts": report.posts_created,
        "categories": report.categories_created,
        "purged": report.documents_purged,
    })))
}
