/**
 * Tenant Registration
 *
 * Creates a tenant with its first site and provisions starter content
 * in one request. The tenant stays `pending` until seeding lands, so a
 * half-provisioned tenant is visible as such and registration can be
 * retried through the seeding endpoint.
 */

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::create_token;
use crate::error::AppError;
use crate::seed::retry::with_retry;
use crate::seed::templates::BusinessOverrides;
use crate::seed::seed_site;
use crate::server::state::AppState;
use crate::store::models::{Branding, Site, SiteStatus, Tenant, TenantStatus};
use crate::tenancy::paths::site_url;
use crate::tenancy::slug::validate_site_slug;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub slug: String,
    pub name: String,
    /// Optional business facts woven into the starter content
    #[serde(default)]
    pub business: Option<BusinessOverrides>,
}

/// POST /api/tenants/register
pub async fn register_tenant(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let slug = request.slug.trim().to_lowercase();
    validate_site_slug(&slug)?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }

    if state.store.find_tenant_by_slug(&slug).await?.is_some()
        || state.store.find_site_by_slug(&slug).await?.is_some()
    {
        return Err(AppError::conflict("That subdomain is already taken"));
    }

    let now = Utc::now();
    let tenant = Tenant {
        id: Uuid::new_v4(),
        slug: slug.clone(),
        name: name.to_string(),
        status: TenantStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    with_retry("create tenant", || state.store.create_tenant(&tenant)).await?;

    let site = Site {
        id: Uuid::new_v4(),
        tenant_id: tenant.id,
        slug: slug.clone(),
        name: name.to_string(),
        status: SiteStatus::Active,
        branding: Branding::default(),
        created_at: now,
        updated_at: now,
    };
    with_retry("create site", || state.store.create_site(&site)).await?;

    let report = match seed_site(
        &state.store,
        &site,
        state.config.addressing_mode,
        &request.business.unwrap_or_default(),
    )
    .await
    {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Seeding failed for new tenant '{}': {}", slug, e);
            // The tenant exists but stays pending; the caller sees a
            // retryable failure without internal detail.
            return Err(AppError::internal(
                "Failed to provision starter content for your tenant. Please try again.",
            ));
        }
    };

    state
        .store
        .set_tenant_status(tenant.id, TenantStatus::Active)
        .await?;
    state.dispatcher.apply(&report.invalidations);

    let token = create_token(&tenant.id.to_string(), &slug, &state.config.jwt_secret)?;
    let url = site_url(
        &slug,
        state.config.addressing_mode,
        &state.config.app_url,
        &state.config.root_domain,
    );

    tracing::info!("Registered tenant '{}' with site '{}'", tenant.slug, site.slug);

    let body = json!({
        "token": token,
        "tenant": {
            "id": tenant.id,
            "slug": tenant.slug,
            "name": tenant.name,
            "status": TenantStatus::Active,
        },
        "site": {
            "id": site.id,
            "slug": site.slug,
            "name": site.name,
            "url": url,
        },
    });

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::server::config::AppConfig;
    use crate::store::memory::MemoryStore;
    use crate::store::models::{Category, FormDoc, NavKind, Navigation, Page, Post, Redirect};
    use crate::store::ContentStore;
    use crate::tenancy::paths::AddressingMode;

    /// Fails the first N tenant/site writes with a transient error,
    /// then behaves like the in-memory store.
    struct FlakyStore {
        inner: MemoryStore,
        failures_left: AtomicU32,
    }

    impl FlakyStore {
        fn failing(times: u32) -> Self {
            Self {
                inner: MemoryStore::new(),
                failures_left: AtomicU32::new(times),
            }
        }

        fn trip(&self) -> Result<(), AppError> {
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(AppError::transient("serialization failure"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ContentStore for FlakyStore {
        async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
            self.inner.find_tenant_by_slug(slug).await
        }
        async fn create_tenant(&self, tenant: &Tenant) -> Result<(), AppError> {
            self.trip()?;
            self.inner.create_tenant(tenant).await
        }
        async fn set_tenant_status(
            &self,
            tenant_id: Uuid,
            status: TenantStatus,
        ) -> Result<(), AppError> {
            self.inner.set_tenant_status(tenant_id, status).await
        }
        async fn find_site_by_slug(&self, slug: &str) -> Result<Option<Site>, AppError> {
            self.inner.find_site_by_slug(slug).await
        }
        async fn sites_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Site>, AppError> {
            self.inner.sites_for_tenant(tenant_id).await
        }
        async fn create_site(&self, site: &Site) -> Result<(), AppError> {
            self.trip()?;
            self.inner.create_site(site).await
        }
        async fn find_page(
            &self,
            site_id: Uuid,
            slug: &str,
            include_drafts: bool,
        ) -> Result<Option<Page>, AppError> {
            self.inner.find_page(site_id, slug, include_drafts).await
        }
        async fn list_published_pages(&self, site_id: Uuid) -> Result<Vec<Page>, AppError> {
            self.inner.list_published_pages(site_id).await
        }
        async fn create_page(&self, page: &Page) -> Result<(), AppError> {
            self.inner.create_page(page).await
        }
        async fn delete_pages_by_slug(&self, site_id: Uuid, slug: &str) -> Result<u64, AppError> {
            self.inner.delete_pages_by_slug(site_id, slug).await
        }
        async fn find_post(
            &self,
            site_id: Uuid,
            slug: &str,
            include_drafts: bool,
        ) -> Result<Option<Post>, AppError> {
            self.inner.find_post(site_id, slug, include_drafts).await
        }
        async fn list_published_posts(&self, site_id: Uuid) -> Result<Vec<Post>, AppError> {
            self.inner.list_published_posts(site_id).await
        }
        async fn create_post(&self, post: &Post) -> Result<(), AppError> {
            self.inner.create_post(post).await
        }
        async fn set_related_posts(
            &self,
            post_id: Uuid,
            related: &[Uuid],
        ) -> Result<(), AppError> {
            self.inner.set_related_posts(post_id, related).await
        }
        async fn delete_posts_by_slug(&self, site_id: Uuid, slug: &str) -> Result<u64, AppError> {
            self.inner.delete_posts_by_slug(site_id, slug).await
        }
        async fn list_categories(&self, site_id: Uuid) -> Result<Vec<Category>, AppError> {
            self.inner.list_categories(site_id).await
        }
        async fn create_category(&self, category: &Category) -> Result<(), AppError> {
            self.inner.create_category(category).await
        }
        async fn delete_categories_by_slug(
            &self,
            site_id: Uuid,
            slug: &str,
        ) -> Result<u64, AppError> {
            self.inner.delete_categories_by_slug(site_id, slug).await
        }
        async fn list_forms(&self, site_id: Uuid) -> Result<Vec<FormDoc>, AppError> {
            self.inner.list_forms(site_id).await
        }
        async fn create_form(&self, form: &FormDoc) -> Result<(), AppError> {
            self.inner.create_form(form).await
        }
        async fn delete_form(&self, id: Uuid) -> Result<(), AppError> {
            self.inner.delete_form(id).await
        }
        async fn find_navigation(
            &self,
            site_id: Uuid,
            kind: NavKind,
        ) -> Result<Option<Navigation>, AppError> {
            self.inner.find_navigation(site_id, kind).await
        }
        async fn create_navigation(&self, navigation: &Navigation) -> Result<(), AppError> {
            self.inner.create_navigation(navigation).await
        }
        async fn find_redirect(&self, from_path: &str) -> Result<Option<Redirect>, AppError> {
            self.inner.find_redirect(from_path).await
        }
    }

    fn test_state(store: Arc<dyn ContentStore>) -> AppState {
        AppState::new(
            AppConfig {
                port: 3000,
                app_url: "http://localhost:3000".to_string(),
                root_domain: String::new(),
                addressing_mode: AddressingMode::PathPrefix,
                database_url: None,
                jwt_secret: "test-secret".to_string(),
            },
            store,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_registration_retries_transient_write_conflicts() {
        let store: Arc<dyn ContentStore> = Arc::new(FlakyStore::failing(2));
        let state = test_state(store.clone());

        let response = register_tenant(
            State(state),
            Json(RegisterRequest {
                slug: "acme".to_string(),
                name: "Acme".to_string(),
                business: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let tenant = store.find_tenant_by_slug("acme").await.unwrap().unwrap();
        assert_eq!(tenant.status, TenantStatus::Active);
    }
}
