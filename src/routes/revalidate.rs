/**
 * Revalidation Route
 *
 * Webhook-style entry point for content mutations happening in the
 * editing layer. The body names the collection and carries the mutated
 * document (plus the pre-mutation snapshot for updates); the matching
 * hook computes the fan-out and the dispatcher applies it.
 */

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::require_claims;
use crate::error::AppError;
use crate::revalidate::{
    hooks, ContentDoc, MutationContext,
};
use crate::server::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextBody {
    #[serde(default)]
    pub disable_revalidate: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevalidateRequest {
    pub collection: String,
    #[serde(default)]
    pub doc: serde_json::Value,
    #[serde(default)]
    pub previous_doc: Option<serde_json::Value>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub context: Option<ContextBody>,
}

#[derive(Debug, Deserialize)]
struct SiteDocBody {
    slug: String,
}

#[derive(Debug, Deserialize)]
struct TenantDocBody {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NavigationDocBody {
    site_slug: String,
}

#[derive(Debug, Deserialize)]
struct RedirectDocBody {
    from: String,
}

fn parse_doc<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::validation(format!("Malformed document: {}", e)))
}

/// POST /api/revalidate
pub async fn revalidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RevalidateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_claims(&headers, &state.config.jwt_secret)?;

    let ctx = MutationContext {
        disable_revalidate: request.context.unwrap_or_default().disable_revalidate,
    };

    let invalidations = match request.collection.as_str() {
        "pages" => {
            let doc: ContentDoc = parse_doc(request.doc)?;
            if request.deleted {
                hooks::revalidate_page_delete(&doc, ctx)
            } else {
                let previous = request.previous_doc.map(parse_doc).transpose()?;
                hooks::revalidate_page(&doc, previous.as_ref(), ctx)
            }
        }
        "posts" => {
            let doc: ContentDoc = parse_doc(request.doc)?;
            if request.deleted {
                hooks::revalidate_post_delete(&doc, ctx)
            } else {
                let previous = request.previous_doc.map(parse_doc).transpose()?;
                hooks::revalidate_post(&doc, previous.as_ref(), ctx)
            }
        }
        "sites" => {
            let doc: SiteDocBody = parse_doc(request.doc)?;
            if request.deleted {
                hooks::revalidate_site_delete(&doc.slug, ctx)
            } else {
                let previous: Option<SiteDocBody> =
                    request.previous_doc.map(parse_doc).transpose()?;
                hooks::revalidate_site(&doc.slug, previous.as_ref().map(|p| p.slug.as_str()), ctx)
            }
        }
        "tenants" => {
            let doc: TenantDocBody = parse_doc(request.doc)?;
            hooks::revalidate_tenant(state.store.as_ref(), &doc.id, ctx).await?
        }
        "navigations" => {
            let doc: NavigationDocBody = parse_doc(request.doc)?;
            hooks::revalidate_navigation(&doc.site_slug, ctx)
        }
        "redirects" => {
            let doc: RedirectDocBody = parse_doc(request.doc)?;
            hooks::revalidate_redirect(&doc.from, ctx)
        }
        other => {
            return Err(AppError::validation(format!(
                "Unknown collection \"{}\"",
                other
            )));
        }
    };

    let removed = state.dispatcher.apply(&invalidations);

    Ok(Json(json!({
        "invalidated": invalidations.len(),
        "removed": removed,
    })))
}
