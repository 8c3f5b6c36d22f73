/**
 * Content Routes
 *
 * Serves rendered site content. The resolver middleware has already
 * rewritten subdomain traffic onto `/sites/<slug>/...`, so by the time
 * a request lands here, site identity is always in the path.
 *
 * Published responses are cached as rendered documents under their
 * canonical path key, tagged like the underlying documents so both
 * path and tag invalidation reach them. Draft mode requires a bearer
 * token and bypasses the cache entirely.
 */

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;

use uuid::Uuid;

use crate::auth::{require_claims, Claims};
use crate::content::redirects::redirect_destination;
use crate::content::tags;
use crate::content::ContentService;
use crate::cache::TagCache;
use crate::error::AppError;
use crate::server::state::AppState;
use crate::store::models::SiteRef;
use crate::tenancy::paths::{parse_content_path, AddressingMode, ContentKind, HOME_SLUG};

/// Claims of a requested draft preview, or `None` for published traffic
///
/// Ownership against the resolved site is checked separately once the
/// site is loaded.
fn draft_claims(
    params: &HashMap<String, String>,
    headers: &HeaderMap,
    jwt_secret: &str,
) -> Result<Option<Claims>, AppError> {
    if params.get("draft").map(String::as_str) != Some("true") {
        return Ok(None);
    }
    require_claims(headers, jwt_secret).map(Some)
}

/// GET /sites/{site}
pub async fn site_home(
    State(state): State<AppState>,
    Path(site): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    serve_content(&state, &site, "", &params, &headers).await
}

/// GET /sites/{site}/{*path}
pub async fn site_path(
    State(state): State<AppState>,
    Path((site, rest)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    serve_content(&state, &site, &rest, &params, &headers).await
}

async fn serve_content(
    state: &AppState,
    site_slug: &str,
    rest: &str,
    params: &HashMap<String, String>,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    let claims = draft_claims(params, headers, &state.config.jwt_secret)?;
    let draft = claims.is_some();

    let canonical = if rest.is_empty() {
        format!("/sites/{}", site_slug)
    } else {
        format!("/sites/{}/{}", site_slug, rest.trim_start_matches('/'))
    };

    if !draft {
        if let Some(cached) = state.cache.get(&TagCache::path_key(&canonical)) {
            return Ok(Json(cached).into_response());
        }
    }

    let site = state
        .content
        .get_site(site_slug, draft)
        .await?
        .ok_or_else(|| AppError::not_found("site"))?;

    // A draft token only unlocks previews of the tenant's own sites.
    if let Some(claims) = &claims {
        let tenant_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid token subject"))?;
        if site.tenant_id != tenant_id {
            return Err(AppError::unauthorized(
                "Site does not belong to this tenant",
            ));
        }
    }

    let site_ref = site.site_ref();

    let parsed = parse_content_path(&canonical, AddressingMode::PathPrefix)
        .ok_or_else(|| AppError::not_found("page"))?;

    match parsed.kind {
        ContentKind::Post => {
            let post = state
                .content
                .get_site_post(&site_ref, &parsed.slug, draft)
                .await?
                .ok_or_else(|| AppError::not_found("post"))?;

            let body = json!({
                "kind": "post",
                "site": site,
                "post": post,
            });

            if !draft {
                cache_rendered(
                    state,
                    &canonical,
                    &body,
                    &site_ref,
                    ContentKind::Post,
                    &parsed.slug,
                );
            }
            Ok(Json(body).into_response())
        }
        ContentKind::Page => {
            match state
                .content
                .get_site_page(&site_ref, &parsed.slug, draft)
                .await?
            {
                Some(page) => {
                    let body = json!({
                        "kind": "page",
                        "site": site,
                        "page": page,
                    });
                    if !draft {
                        cache_rendered(
                            state,
                            &canonical,
                            &body,
                            &site_ref,
                            ContentKind::Page,
                            &parsed.slug,
                        );
                    }
                    Ok(Json(body).into_response())
                }
                None => page_miss(state, &site_ref, &parsed.slug, &canonical).await,
            }
        }
    }
}

/// A page miss checks redirects first, then falls back to the
/// placeholder for the site root; anything else is a 404.
async fn page_miss(
    state: &AppState,
    site: &SiteRef,
    slug: &str,
    canonical: &str,
) -> Result<Response, AppError> {
    if let Some(redirect) = state.content.get_redirect(canonical).await? {
        let destination = redirect_destination(&redirect, state.config.addressing_mode);
        return Ok(Redirect::permanent(&destination).into_response());
    }

    if slug == HOME_SLUG {
        let page = ContentService::coming_soon_page(site);
        let body = json!({
            "kind": "page",
            "placeholder": true,
            "page": page,
        });
        return Ok(Json(body).into_response());
    }

    Err(AppError::not_found("page"))
}

fn cache_rendered(
    state: &AppState,
    canonical: &str,
    body: &serde_json::Value,
    site: &SiteRef,
    kind: ContentKind,
    slug: &str,
) {
    let entity_tag = match kind {
        ContentKind::Page => tags::page_tag(&site.slug, slug),
        ContentKind::Post => tags::post_tag(&site.slug, slug),
    };
    let coarse = match kind {
        ContentKind::Page => tags::PAGES,
        ContentKind::Post => tags::POSTS,
    };

    state.cache.put(
        TagCache::path_key(canonical),
        body.clone(),
        &[
            coarse.to_string(),
            tags::site_tag(&site.slug),
            entity_tag,
        ],
    );
}
