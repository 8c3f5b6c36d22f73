//! Common test utilities
//!
//! Builds a full application over the in-memory store and provides
//! fixture helpers for tenants, sites, and content.

use std::sync::Arc;

use axum_test::TestServer;
use chrono::Utc;
use uuid::Uuid;

use sitewright::routes::router::create_router;
use sitewright::server::config::AppConfig;
use sitewright::server::state::AppState;
use sitewright::store::memory::MemoryStore;
use sitewright::store::models::{
    Branding, Page, Post, PublishStatus, Seo, Site, SiteStatus, Tenant, TenantStatus,
};
use sitewright::store::ContentStore;
use sitewright::tenancy::paths::AddressingMode;

pub const TEST_SECRET: &str = "test-secret";

pub fn test_config(mode: AddressingMode) -> AppConfig {
    let (app_url, root_domain) = match mode {
        AddressingMode::Subdomain => ("https://app.example.com".to_string(), "example.com".to_string()),
        AddressingMode::PathPrefix => ("http://localhost:3000".to_string(), String::new()),
    };
    AppConfig {
        port: 3000,
        app_url,
        root_domain,
        addressing_mode: mode,
        database_url: None,
        jwt_secret: TEST_SECRET.to_string(),
    }
}

/// An application over a fresh in-memory store
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

pub fn test_app(mode: AddressingMode) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(test_config(mode), store.clone());
    let server = TestServer::new(create_router(state.clone())).unwrap();
    TestApp {
        server,
        state,
        store,
    }
}

/// Create a tenant with one active site directly in the store
pub async fn create_site_fixture(store: &Arc<MemoryStore>, slug: &str) -> Site {
    let now = Utc::now();
    let tenant = Tenant {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        name: slug.to_string(),
        status: TenantStatus::Active,
        created_at: now,
        updated_at: now,
    };
    store.create_tenant(&tenant).await.unwrap();

    let site = Site {
        id: Uuid::new_v4(),
        tenant_id: tenant.id,
        slug: slug.to_string(),
        name: slug.to_string(),
        status: SiteStatus::Active,
        branding: Branding::default(),
        created_at: now,
        updated_at: now,
    };
    store.create_site(&site).await.unwrap();
    site
}

pub async fn create_page_fixture(
    store: &Arc<MemoryStore>,
    site: &Site,
    slug: &str,
    status: PublishStatus,
) -> Page {
    let now = Utc::now();
    let page = Page {
        id: Uuid::new_v4(),
        site_id: site.id,
        slug: slug.to_string(),
        title: slug.to_string(),
        status,
        layout: serde_json::json!([{"blockType": "content"}]),
        seo: Seo::default(),
        created_at: now,
        updated_at: now,
    };
    store.create_page(&page).await.unwrap();
    page
}

pub async fn create_post_fixture(
    store: &Arc<MemoryStore>,
    site: &Site,
    slug: &str,
    status: PublishStatus,
) -> Post {
    let now = Utc::now();
    let post = Post {
        id: Uuid::new_v4(),
        site_id: site.id,
        slug: slug.to_string(),
        title: slug.to_string(),
        status,
        excerpt: None,
        body: serde_json::json!({"blocks": []}),
        categories: Vec::new(),
        related_posts: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    store.create_post(&post).await.unwrap();
    post
}

/// A bearer token for the tenant owning a fixture site
pub fn token_for(site: &Site, slug: &str) -> String {
    sitewright::auth::create_token(&site.tenant_id.to_string(), slug, TEST_SECRET).unwrap()
}
