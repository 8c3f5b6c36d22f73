//! Content route integration tests
//!
//! Draft gating, the placeholder fallback, redirects, sitemaps, and
//! cache invalidation through the revalidation endpoint.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{create_page_fixture, create_post_fixture, create_site_fixture, test_app, token_for};
use sitewright::cache::TagCache;
use sitewright::store::models::{PublishStatus, Redirect, RedirectTarget};
use sitewright::tenancy::paths::{AddressingMode, ContentKind};
use uuid::Uuid;

#[tokio::test]
async fn test_draft_page_requires_token() {
    let app = test_app(AddressingMode::PathPrefix);
    let site = create_site_fixture(&app.store, "acme").await;
    create_page_fixture(&app.store, &site, "launch", PublishStatus::Draft).await;

    // Published traffic cannot see the draft.
    let anonymous = app.server.get("/sites/acme/launch").await;
    assert_eq!(anonymous.status_code(), StatusCode::NOT_FOUND);

    // Draft mode without a token is rejected outright.
    let unauthorized = app
        .server
        .get("/sites/acme/launch")
        .add_query_param("draft", "true")
        .await;
    assert_eq!(unauthorized.status_code(), StatusCode::UNAUTHORIZED);

    let authorized = app
        .server
        .get("/sites/acme/launch")
        .add_query_param("draft", "true")
        .add_header(
            "authorization",
            format!("Bearer {}", token_for(&site, "acme")),
        )
        .await;
    assert_eq!(authorized.status_code(), StatusCode::OK);
    let body: serde_json::Value = authorized.json();
    assert_eq!(body["page"]["status"], "draft");
}

#[tokio::test]
async fn test_draft_preview_is_scoped_to_the_owning_tenant() {
    let app = test_app(AddressingMode::PathPrefix);
    let site = create_site_fixture(&app.store, "acme").await;
    let other = create_site_fixture(&app.store, "globex").await;
    create_page_fixture(&app.store, &site, "launch", PublishStatus::Draft).await;

    // A perfectly valid token for another tenant does not unlock
    // acme's drafts.
    let response = app
        .server
        .get("/sites/acme/launch")
        .add_query_param("draft", "true")
        .add_header(
            "authorization",
            format!("Bearer {}", token_for(&other, "globex")),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_home_serves_placeholder() {
    let app = test_app(AddressingMode::PathPrefix);
    create_site_fixture(&app.store, "acme").await;

    let response = app.server.get("/sites/acme").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["placeholder"], true);
    assert_eq!(body["page"]["title"], "Coming soon");
}

#[tokio::test]
async fn test_missing_inner_page_is_404() {
    let app = test_app(AddressingMode::PathPrefix);
    create_site_fixture(&app.store, "acme").await;

    let response = app.server.get("/sites/acme/no-such-page").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_site_is_404() {
    let app = test_app(AddressingMode::PathPrefix);

    let response = app.server.get("/sites/ghost").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_redirect_wins_over_404() {
    let app = test_app(AddressingMode::PathPrefix);
    let site = create_site_fixture(&app.store, "acme").await;
    create_page_fixture(&app.store, &site, "about-us", PublishStatus::Published).await;
    app.store.add_redirect(Redirect {
        id: Uuid::new_v4(),
        from_path: "/sites/acme/about".to_string(),
        to: RedirectTarget::Content {
            kind: ContentKind::Page,
            site_slug: "acme".to_string(),
            slug: "about-us".to_string(),
        },
        created_at: Utc::now(),
    });

    let response = app.server.get("/sites/acme/about").await;
    assert_eq!(response.status_code(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/sites/acme/about-us")
    );
}

#[tokio::test]
async fn test_posts_route_serves_published_posts_only() {
    let app = test_app(AddressingMode::PathPrefix);
    let site = create_site_fixture(&app.store, "acme").await;
    create_post_fixture(&app.store, &site, "hello", PublishStatus::Published).await;
    create_post_fixture(&app.store, &site, "wip", PublishStatus::Draft).await;

    let published = app.server.get("/sites/acme/posts/hello").await;
    assert_eq!(published.status_code(), StatusCode::OK);
    let body: serde_json::Value = published.json();
    assert_eq!(body["kind"], "post");
    assert_eq!(body["post"]["slug"], "hello");

    let draft = app.server.get("/sites/acme/posts/wip").await;
    assert_eq!(draft.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pages_sitemap_lists_published_pages() {
    let app = test_app(AddressingMode::PathPrefix);
    let site = create_site_fixture(&app.store, "acme").await;
    create_page_fixture(&app.store, &site, "home", PublishStatus::Published).await;
    create_page_fixture(&app.store, &site, "about", PublishStatus::Published).await;
    create_page_fixture(&app.store, &site, "secret", PublishStatus::Draft).await;

    let response = app.server.get("/sites/acme/pages-sitemap.xml").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/xml")
    );

    let xml = response.text();
    assert!(xml.contains("<urlset"));
    assert!(xml.contains("http://localhost:3000/sites/acme/about"));
    // The home page collapses to the site root.
    assert!(xml.contains("<loc>http://localhost:3000/sites/acme</loc>"));
    assert!(!xml.contains("secret"));
}

#[tokio::test]
async fn test_unknown_site_sitemap_is_empty_but_valid() {
    let app = test_app(AddressingMode::PathPrefix);

    let response = app.server.get("/sites/ghost/posts-sitemap.xml").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let xml = response.text();
    assert!(xml.contains("<urlset"));
    assert!(!xml.contains("<url>"));
}

#[tokio::test]
async fn test_rendered_route_is_cached_and_revalidation_clears_it() {
    let app = test_app(AddressingMode::PathPrefix);
    let site = create_site_fixture(&app.store, "acme").await;
    create_page_fixture(&app.store, &site, "about", PublishStatus::Published).await;

    let response = app.server.get("/sites/acme/about").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(app
        .state
        .cache
        .get(&TagCache::path_key("/sites/acme/about"))
        .is_some());

    // An unpublish event for the page clears the rendered route.
    let revalidate = app
        .server
        .post("/api/revalidate")
        .add_header(
            "authorization",
            format!("Bearer {}", token_for(&site, "acme")),
        )
        .json(&serde_json::json!({
            "collection": "pages",
            "doc": {
                "id": "p1",
                "slug": "about",
                "status": "draft",
                "site": {"id": site.id.to_string(), "slug": "acme"},
            },
            "previousDoc": {
                "id": "p1",
                "slug": "about",
                "status": "published",
                "site": {"id": site.id.to_string(), "slug": "acme"},
            },
        }))
        .await;
    assert_eq!(revalidate.status_code(), StatusCode::OK);

    assert!(app
        .state
        .cache
        .get(&TagCache::path_key("/sites/acme/about"))
        .is_none());
}

#[tokio::test]
async fn test_rename_revalidation_clears_old_path() {
    let app = test_app(AddressingMode::PathPrefix);
    let site = create_site_fixture(&app.store, "acme").await;
    create_page_fixture(&app.store, &site, "about", PublishStatus::Published).await;

    app.server.get("/sites/acme/about").await;
    assert!(app
        .state
        .cache
        .get(&TagCache::path_key("/sites/acme/about"))
        .is_some());

    let response = app
        .server
        .post("/api/revalidate")
        .add_header(
            "authorization",
            format!("Bearer {}", token_for(&site, "acme")),
        )
        .json(&serde_json::json!({
            "collection": "pages",
            "doc": {
                "id": "p1",
                "slug": "about-us",
                "status": "published",
                "site": {"id": site.id.to_string(), "slug": "acme"},
            },
            "previousDoc": {
                "id": "p1",
                "slug": "about",
                "status": "published",
                "site": {"id": site.id.to_string(), "slug": "acme"},
            },
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    assert!(app
        .state
        .cache
        .get(&TagCache::path_key("/sites/acme/about"))
        .is_none());
}

#[tokio::test]
async fn test_revalidation_requires_auth() {
    let app = test_app(AddressingMode::PathPrefix);

    let response = app
        .server
        .post("/api/revalidate")
        .json(&serde_json::json!({"collection": "pages", "doc": {}}))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
