/**
 * Store Module
 *
 * The document store is an external collaborator consumed through a
 * narrow interface. `ContentStore` is that interface; `PgStore` is the
 * production implementation over PostgreSQL, and `MemoryStore` backs
 * tests and database-less development.
 */

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use models::{Category, FormDoc, NavKind, Navigation, Page, Post, Redirect, Site, Tenant};

/// Narrow interface over the document store
///
/// Every method returns `Ok(None)` / empty collections for absent
/// documents; absence is a normal outcome. Uniqueness violations map to
/// `AppError::Conflict`, transient write contention to
/// `AppError::TransientWrite`.
#[async_trait]
pub trait ContentStore: Send + Sync {
    // Tenants
    async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;
    async fn create_tenant(&self, tenant: &Tenant) -> Result<(), AppError>;
    async fn set_tenant_status(
        &self,
        tenant_id: Uuid,
        status: models::TenantStatus,
    ) -> Result<(), AppError>;

    // Sites
    async fn find_site_by_slug(&self, slug: &str) -> Result<Option<Site>, AppError>;
    async fn sites_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Site>, AppError>;
    async fn create_site(&self, site: &Site) -> Result<(), AppError>;

    // Pages
    async fn find_page(
        &self,
        site_id: Uuid,
        slug: &str,
        include_drafts: bool,
    ) -> Result<Option<Page>, AppError>;
    async fn list_published_pages(&self, site_id: Uuid) -> Result<Vec<Page>, AppError>;
    async fn create_page(&self, page: &Page) -> Result<(), AppError>;
    async fn delete_pages_by_slug(&self, site_id: Uuid, slug: &str) -> Result<u64, AppError>;

    // Posts
    async fn find_post(
        &self,
        site_id: Uuid,
        slug: &str,
        include_drafts: bool,
    ) -> Result<Option<Post>, AppError>;
    async fn list_published_posts(&self, site_id: Uuid) -> Result<Vec<Post>, AppError>;
    async fn create_post(&self, post: &Post) -> Result<(), AppError>;
    async fn set_related_posts(&self, post_id: Uuid, related: &[Uuid]) -> Result<(), AppError>;
    async fn delete_posts_by_slug(&self, site_id: Uuid, slug: &str) -> Result<u64, AppError>;

    // Categories
    async fn list_categories(&self, site_id: Uuid) -> Result<Vec<Category>, AppError>;
    async fn create_category(&self, category: &Category) -> Result<(), AppError>;
    async fn delete_categories_by_slug(&self, site_id: Uuid, slug: &str)
        -> Result<u64, AppError>;

    // Forms
    async fn list_forms(&self, site_id: Uuid) -> Result<Vec<FormDoc>, AppError>;
    async fn create_form(&self, form: &FormDoc) -> Result<(), AppError>;
    async fn delete_form(&self, id: Uuid) -> Result<(), AppError>;

    // Navigation
    async fn find_navigation(
        &self,
        site_id: Uuid,
        kind: NavKind,
    ) -> Result<Option<Navigation>, AppError>;
    async fn create_navigation(&self, navigation: &Navigation) -> Result<(), AppError>;

    // Redirects
    async fn find_redirect(&self, from_path: &str) -> Result<Option<Redirect>, AppError>;
}
