/**
 * PostgreSQL Content Store
 *
 * Production `ContentStore` implementation over sqlx. Uniqueness is
 * enforced by the schema's unique indexes; serialization failures and
 * deadlocks surface as transient errors so the provisioning retry
 * policy can re-attempt them.
 */

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::models::{
    Category, FormDoc, NavKind, Navigation, Page, Post, Redirect, Site, Tenant, TenantStatus,
};
use crate::store::ContentStore;

/// Postgres-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map database failures onto the application taxonomy
///
/// 40001 (serialization_failure) and 40P01 (deadlock_detected) are the
/// write conflicts Postgres reports under concurrent load.
fn map_db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::conflict(db.message().to_string());
        }
        if matches!(db.code().as_deref(), Some("40001") | Some("40P01")) {
            return AppError::transient(db.message().to_string());
        }
    }
    AppError::Store(err)
}

#[async_trait]
impl ContentStore for PgStore {
    async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, slug, name, status, created_at, updated_at
            FROM tenants
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn create_tenant(&self, tenant: &Tenant) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO tenants (id, slug, name, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(tenant.id)
        .bind(&tenant.slug)
        .bind(&tenant.name)
        .bind(tenant.status)
        .bind(tenant.created_at)
        .bind(tenant.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn set_tenant_status(
        &self,
        tenant_id: Uuid,
        status: TenantStatus,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE tenants SET status = $1, updated_at = NOW() WHERE id = $2
            "#,
        )
        .bind(status)
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("tenant"));
        }
        Ok(())
    }

    async fn find_site_by_slug(&self, slug: &str) -> Result<Option<Site>, AppError> {
        sqlx::query_as::<_, Site>(
            r#"
            SELECT id, tenant_id, slug, name, status, branding, created_at, updated_at
            FROM sites
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn sites_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Site>, AppError> {
        sqlx::query_as::<_, Site>(
            r#"
            SELECT id, tenant_id, slug, name, status, branding, created_at, updated_at
            FROM sites
            WHERE tenant_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn create_site(&self, site: &Site) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO sites (id, tenant_id, slug, name, status, branding, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(site.id)
        .bind(site.tenant_id)
        .bind(&site.slug)
        .bind(&site.name)
        .bind(site.status)
        .bind(Json(&site.branding))
        .bind(site.created_at)
        .bind(site.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_page(
        &self,
        site_id: Uuid,
        slug: &str,
        include_drafts: bool,
    ) -> Result<Option<Page>, AppError> {
        sqlx::query_as::<_, Page>(
            r#"
            SELECT id, site_id, slug, title, status, layout, seo, created_at, updated_at
            FROM pages
            WHERE site_id = $1 AND slug = $2 AND ($3 OR status = 'published')
            "#,
        )
        .bind(site_id)
        .bind(slug)
        .bind(include_drafts)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_published_pages(&self, site_id: Uuid) -> Result<Vec<Page>, AppError> {
        sqlx::query_as::<_, Page>(
            r#"
            SELECT id, site_id, slug, title, status, layout, seo, created_at, updated_at
            FROM pages
            WHERE site_id = $1 AND status = 'published'
            ORDER BY slug
            "#,
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn create_page(&self, page: &Page) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO pages (id, site_id, slug, title, status, layout, seo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(page.id)
        .bind(page.site_id)
        .bind(&page.slug)
        .bind(&page.title)
        .bind(page.status)
        .bind(Json(&page.layout))
        .bind(Json(&page.seo))
        .bind(page.created_at)
        .bind(page.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn delete_pages_by_slug(&self, site_id: Uuid, slug: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM pages WHERE site_id = $1 AND slug = $2
            "#,
        )
        .bind(site_id)
        .bind(slug)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    async fn find_post(
        &self,
        site_id: Uuid,
        slug: &str,
        include_drafts: bool,
    ) -> Result<Option<Post>, AppError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, site_id, slug, title, status, excerpt, body, categories, related_posts,
                   created_at, updated_at
            FROM posts
            WHERE site_id = $1 AND slug = $2 AND ($3 OR status = 'published')
            "#,
        )
        .bind(site_id)
        .bind(slug)
        .bind(include_drafts)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_published_posts(&self, site_id: Uuid) -> Result<Vec<Post>, AppError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, site_id, slug, title, status, excerpt, body, categories, related_posts,
                   created_at, updated_at
            FROM posts
            WHERE site_id = $1 AND status = 'published'
            ORDER BY created_at DESC
            "#,
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn create_post(&self, post: &Post) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, site_id, slug, title, status, excerpt, body, categories,
                               related_posts, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(post.id)
        .bind(post.site_id)
        .bind(&post.slug)
        .bind(&post.title)
        .bind(post.status)
        .bind(&post.excerpt)
        .bind(Json(&post.body))
        .bind(&post.categories)
        .bind(&post.related_posts)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn set_related_posts(&self, post_id: Uuid, related: &[Uuid]) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE posts SET related_posts = $1, updated_at = NOW() WHERE id = $2
            "#,
        )
        .bind(related)
        .bind(post_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("post"));
        }
        Ok(())
    }

    async fn delete_posts_by_slug(&self, site_id: Uuid, slug: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts WHERE site_id = $1 AND slug = $2
            "#,
        )
        .bind(site_id)
        .bind(slug)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    async fn list_categories(&self, site_id: Uuid) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, site_id, slug, title, created_at
            FROM categories
            WHERE site_id = $1
            ORDER BY title
            "#,
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn create_category(&self, category: &Category) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, site_id, slug, title, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(category.id)
        .bind(category.site_id)
        .bind(&category.slug)
        .bind(&category.title)
        .bind(category.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn delete_categories_by_slug(
        &self,
        site_id: Uuid,
        slug: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM categories WHERE site_id = $1 AND slug = $2
            "#,
        )
        .bind(site_id)
        .bind(slug)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    async fn list_forms(&self, site_id: Uuid) -> Result<Vec<FormDoc>, AppError> {
        sqlx::query_as::<_, FormDoc>(
            r#"
            SELECT id, site_id, title, fields, confirmation_message, notification_email, created_at
            FROM forms
            WHERE site_id = $1
            "#,
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn create_form(&self, form: &FormDoc) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO forms (id, site_id, title, fields, confirmation_message,
                               notification_email, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(form.id)
        .bind(form.site_id)
        .bind(&form.title)
        .bind(Json(&form.fields))
        .bind(&form.confirmation_message)
        .bind(&form.notification_email)
        .bind(form.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn delete_form(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            DELETE FROM forms WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_navigation(
        &self,
        site_id: Uuid,
        kind: NavKind,
    ) -> Result<Option<Navigation>, AppError> {
        sqlx::query_as::<_, Navigation>(
            r#"
            SELECT id, site_id, kind, items, created_at, updated_at
            FROM navigations
            WHERE site_id = $1 AND kind = $2
            "#,
        )
        .bind(site_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn create_navigation(&self, navigation: &Navigation) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO navigations (id, site_id, kind, items, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(navigation.id)
        .bind(navigation.site_id)
        .bind(navigation.kind)
        .bind(Json(&navigation.items))
        .bind(navigation.created_at)
        .bind(navigation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_redirect(&self, from_path: &str) -> Result<Option<Redirect>, AppError> {
        sqlx::query_as::<_, Redirect>(
            r#"
            SELECT id, from_path, target, created_at
            FROM redirects
            WHERE from_path = $1
            "#,
        )
        .bind(from_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
