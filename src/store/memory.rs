/**
 * In-Memory Content Store
 *
 * A `ContentStore` implementation over plain vectors behind a RwLock.
 * Backs the test suite and database-less local development; enforces
 * the same uniqueness rules as the Postgres schema so both paths fail
 * identically on duplicate slugs.
 */

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::models::{
    Category, FormDoc, NavKind, Navigation, Page, Post, Redirect, Site, Tenant, TenantStatus,
};
use crate::store::ContentStore;

#[derive(Default)]
struct Inner {
    tenants: Vec<Tenant>,
    sites: Vec<Site>,
    pages: Vec<Page>,
    posts: Vec<Post>,
    categories: Vec<Category>,
    forms: Vec<FormDoc>,
    navigations: Vec<Navigation>,
    redirects: Vec<Redirect>,
}

/// In-memory store; cheap to construct per test
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a redirect mapping (admin CRUD is out of scope; tests
    /// and dev fixtures insert directly)
    pub fn add_redirect(&self, redirect: Redirect) {
        self.write().redirects.push(redirect);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        Ok(self.read().tenants.iter().find(|t| t.slug == slug).cloned())
    }

    async fn create_tenant(&self, tenant: &Tenant) -> Result<(), AppError> {
        let mut inner = self.write();
        if inner.tenants.iter().any(|t| t.slug == tenant.slug) {
            return Err(AppError::conflict(format!(
                "Tenant slug \"{}\" already taken",
                tenant.slug
            )));
        }
        inner.tenants.push(tenant.clone());
        Ok(())
    }

    async fn set_tenant_status(
        &self,
        tenant_id: Uuid,
        status: TenantStatus,
    ) -> Result<(), AppError> {
        let mut inner = self.write();
        match inner.tenants.iter_mut().find(|t| t.id == tenant_id) {
            Some(tenant) => {
                tenant.status = status;
                tenant.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AppError::not_found("tenant")),
        }
    }

    async fn find_site_by_slug(&self, slug: &str) -> Result<Option<Site>, AppError> {
        Ok(self.read().sites.iter().find(|s| s.slug == slug).cloned())
    }

    async fn sites_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Site>, AppError> {
        Ok(self
            .read()
            .sites
            .iter()
            .filter(|s| s.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn create_site(&self, site: &Site) -> Result<(), AppError> {
        let mut inner = self.write();
        if inner.sites.iter().any(|s| s.slug == site.slug) {
            return Err(AppError::conflict(format!(
                "Site slug \"{}\" already taken",
                site.slug
            )));
        }
        inner.sites.push(site.clone());
        Ok(())
    }

    async fn find_page(
        &self,
        site_id: Uuid,
        slug: &str,
        include_drafts: bool,
    ) -> Result<Option<Page>, AppError> {
        Ok(self
            .read()
            .pages
            .iter()
            .find(|p| p.site_id == site_id && p.slug == slug && (include_drafts || p.is_published()))
            .cloned())
    }

    async fn list_published_pages(&self, site_id: Uuid) -> Result<Vec<Page>, AppError> {
        Ok(self
            .read()
            .pages
            .iter()
            .filter(|p| p.site_id == site_id && p.is_published())
            .cloned()
            .collect())
    }

    async fn create_page(&self, page: &Page) -> Result<(), AppError> {
        let mut inner = self.write();
        if inner
            .pages
            .iter()
            .any(|p| p.site_id == page.site_id && p.slug == page.slug)
        {
            return Err(AppError::conflict(format!(
                "Page slug \"{}\" already exists for this site",
                page.slug
            )));
        }
        inner.pages.push(page.clone());
        Ok(())
    }

    async fn delete_pages_by_slug(&self, site_id: Uuid, slug: &str) -> Result<u64, AppError> {
        let mut inner = self.write();
        let before = inner.pages.len();
        inner
            .pages
            .retain(|p| !(p.site_id == site_id && p.slug == slug));
        Ok((before - inner.pages.len()) as u64)
    }

    async fn find_post(
        &self,
        site_id: Uuid,
        slug: &str,
        include_drafts: bool,
    ) -> Result<Option<Post>, AppError> {
        Ok(self
            .read()
            .posts
            .iter()
            .find(|p| p.site_id == site_id && p.slug == slug && (include_drafts || p.is_published()))
            .cloned())
    }

    async fn list_published_posts(&self, site_id: Uuid) -> Result<Vec<Post>, AppError> {
        Ok(self
            .read()
            .posts
            .iter()
            .filter(|p| p.site_id == site_id && p.is_published())
            .cloned()
            .collect())
    }

    async fn create_post(&self, post: &Post) -> Result<(), AppError> {
        let mut inner = self.write();
        if inner
            .posts
            .iter()
            .any(|p| p.site_id == post.site_id && p.slug == post.slug)
        {
            return Err(AppError::conflict(format!(
                "Post slug \"{}\" already exists for this site",
                post.slug
            )));
        }
        inner.posts.push(post.clone());
        Ok(())
    }

    async fn set_related_posts(&self, post_id: Uuid, related: &[Uuid]) -> Result<(), AppError> {
        let mut inner = self.write();
        match inner.posts.iter_mut().find(|p| p.id == post_id) {
            Some(post) => {
                post.related_posts = related.to_vec();
                post.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AppError::not_found("post")),
        }
    }

    async fn delete_posts_by_slug(&self, site_id: Uuid, slug: &str) -> Result<u64, AppError> {
        let mut inner = self.write();
        let before = inner.posts.len();
        inner
            .posts
            .retain(|p| !(p.site_id == site_id && p.slug == slug));
        Ok((before - inner.posts.len()) as u64)
    }

    async fn list_categories(&self, site_id: Uuid) -> Result<Vec<Category>, AppError> {
        Ok(self
            .read()
            .categories
            .iter()
            .filter(|c| c.site_id == site_id)
            .cloned()
            .collect())
    }

    async fn create_category(&self, category: &Category) -> Result<(), AppError> {
        let mut inner = self.write();
        if inner
            .categories
            .iter()
            .any(|c| c.site_id == category.site_id && c.slug == category.slug)
        {
            return Err(AppError::conflict(format!(
                "Category slug \"{}\" already exists for this site",
                category.slug
            )));
        }
        inner.categories.push(category.clone());
        Ok(())
    }

    async fn delete_categories_by_slug(
        &self,
        site_id: Uuid,
        slug: &str,
    ) -> Result<u64, AppError> {
        let mut inner = self.write();
        let before = inner.categories.len();
        inner
            .categories
            .retain(|c| !(c.site_id == site_id && c.slug == slug));
        Ok((before - inner.categories.len()) as u64)
    }

    async fn list_forms(&self, site_id: Uuid) -> Result<Vec<FormDoc>, AppError> {
        Ok(self
            .read()
            .forms
            .iter()
            .filter(|f| f.site_id == site_id)
            .cloned()
            .collect())
    }

    async fn create_form(&self, form: &FormDoc) -> Result<(), AppError> {
        self.write().forms.push(form.clone());
        Ok(())
    }

    async fn delete_form(&self, id: Uuid) -> Result<(), AppError> {
        self.write().forms.retain(|f| f.id != id);
        Ok(())
    }

    async fn find_navigation(
        &self,
        site_id: Uuid,
        kind: NavKind,
    ) -> Result<Option<Navigation>, AppError> {
        Ok(self
            .read()
            .navigations
            .iter()
            .find(|n| n.site_id == site_id && n.kind == kind)
            .cloned())
    }

    async fn create_navigation(&self, navigation: &Navigation) -> Result<(), AppError> {
        let mut inner = self.write();
        if inner
            .navigations
            .iter()
            .any(|n| n.site_id == navigation.site_id && n.kind == navigation.kind)
        {
            return Err(AppError::conflict(
                "Navigation already exists for this site",
            ));
        }
        inner.navigations.push(navigation.clone());
        Ok(())
    }

    async fn find_redirect(&self, from_path: &str) -> Result<Option<Redirect>, AppError> {
        Ok(self
            .read()
            .redirects
            .iter()
            .find(|r| r.from_path == from_path)
            .cloned())
    }
}
