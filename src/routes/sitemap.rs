/**
 * Sitemap Routes
 *
 * Per-site page and post sitemaps. An unknown site serves an empty but
 * valid document rather than a 404, which keeps crawlers quiet while a
 * site is being provisioned.
 */

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::content::sitemap::sitemap_xml;
use crate::error::AppError;
use crate::server::state::AppState;

fn xml_response(xml: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

/// GET /sites/{site}/pages-sitemap.xml
pub async fn pages_sitemap(
    State(state): State<AppState>,
    Path(site): Path<String>,
) -> Result<Response, AppError> {
    let entries = state
        .content
        .pages_sitemap_entries(&site, &state.url_context())
        .await?;
    Ok(xml_response(sitemap_xml(&entries)))
}

/// GET /sites/{site}/posts-sitemap.xml
pub async fn posts_sitemap(
    State(state): State<AppState>,
    Path(site): Path<String>,
) -> Result<Response, AppError> {
    let entries = state
        .content
        .posts_sitemap_entries(&site, &state.url_context())
        .await?;
    Ok(xml_response(sitemap_xml(&entries)))
}
