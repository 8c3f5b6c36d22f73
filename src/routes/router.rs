/**
 * Router
 *
 * The full route table. The host/path resolver rewrites the request URI
 * ahead of routing for every request, so subdomain traffic arrives at
 * the `/sites` routes already rewritten.
 */

use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower::Layer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::routes::{content, register, revalidate, seed, sitemap};
use crate::server::state::AppState;
use crate::tenancy::resolver::resolve_site;

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Not found", "status": 404})),
    )
}

pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/tenants/register", post(register::register_tenant))
        .route("/api/seed", post(seed::seed))
        .route("/api/revalidate", post(revalidate::revalidate))
        .route("/sites/{site}", get(content::site_home))
        .route("/sites/{site}/pages-sitemap.xml", get(sitemap::pages_sitemap))
        .route("/sites/{site}/posts-sitemap.xml", get(sitemap::posts_sitemap))
        .route("/sites/{site}/{*path}", get(content::site_path))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Routing is resolved before `Router::layer` middleware runs, so a
    // URI rewrite applied there can never change which route matches.
    // The resolver has to wrap the route table from the outside; the
    // outer router forwards every request into it.
    let resolver = middleware::from_fn_with_state(state, resolve_site);
    Router::new().fallback_service(resolver.layer(routes))
}
