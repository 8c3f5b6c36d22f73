/**
 * Content Data Access
 *
 * Resolves sites and their pages/posts with two parallel read paths:
 *
 * - Published path: reads go through the tag cache, keyed by entity and
 *   slug, tagged so the revalidation fan-out can force a refresh.
 * - Draft/preview path: bypasses the cache entirely and queries the
 *   live store, with unpublished documents visible.
 *
 * A lookup that finds no site is a normal not-found outcome. A lookup
 * that finds a site but no matching page falls back to a built-in
 * "coming soon" placeholder; posts have no such fallback.
 */

pub mod redirects;
pub mod sitemap;
pub mod tags;

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::cache::TagCache;
use crate::error::AppError;
use crate::store::models::{Page, Post, PublishStatus, Seo, Site, SiteRef};
use crate::store::ContentStore;

/// Site/page/post resolution over the store and cache
#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn ContentStore>,
    cache: Arc<TagCache>,
}

impl ContentService {
    pub fn new(store: Arc<dyn ContentStore>, cache: Arc<TagCache>) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<TagCache> {
        &self.cache
    }

    /// Resolve a site by slug
    ///
    /// Draft mode bypasses the cache; the published path caches under
    /// `site:<slug>` tagged for fan-out refresh.
    pub async fn get_site(&self, slug: &str, draft: bool) -> Result<Option<Site>, AppError> {
        if draft {
            return self.store.find_site_by_slug(slug).await;
        }

        let key = format!("site:{}", slug);
        if let Some(site) = self.cache.get_as::<Site>(&key) {
            return Ok(Some(site));
        }

        let site = self.store.find_site_by_slug(slug).await?;

        if let Some(site) = &site {
            self.cache.put(
                key,
                serde_json::to_value(site)?,
                &[tags::SITES.to_string(), tags::site_tag(slug)],
            );
        }

        Ok(site)
    }

    /// Resolve a page by slug within a site
    ///
    /// Returns `None` on a miss; callers decide between redirect lookup
    /// and the placeholder fallback.
    pub async fn get_site_page(
        &self,
        site: &SiteRef,
        slug: &str,
        draft: bool,
    ) -> Result<Option<Page>, AppError> {
        let cache_slug = if slug.is_empty() { "home" } else { slug };

        if draft {
            return self.store.find_page(site.id, cache_slug, true).await;
        }

        let key = format!("page:{}:{}", site.id, cache_slug);
        if let Some(page) = self.cache.get_as::<Page>(&key) {
            return Ok(Some(page));
        }

        let page = self.store.find_page(site.id, cache_slug, false).await?;

        if let Some(page) = &page {
            self.cache.put(
                key,
                serde_json::to_value(page)?,
                &[
                    tags::PAGES.to_string(),
                    tags::site_tag(&site.slug),
                    tags::page_tag(&site.slug, cache_slug),
                ],
            );
        }

        Ok(page)
    }

    /// Resolve a post by slug within a site
    pub async fn get_site_post(
        &self,
        site: &SiteRef,
        slug: &str,
        draft: bool,
    ) -> Result<Option<Post>, AppError> {
        if draft {
            return self.store.find_post(site.id, slug, true).await;
        }

        let key = format!("post:{}:{}", site.id, slug);
        if let Some(post) = self.cache.get_as::<Post>(&key) {
            return Ok(Some(post));
        }

        let post = self.store.find_post(site.id, slug, false).await?;

        if let Some(post) = &post {
            self.cache.put(
                key,
                serde_json::to_value(post)?,
                &[
                    tags::POSTS.to_string(),
                    tags::site_tag(&site.slug),
                    tags::post_tag(&site.slug, slug),
                ],
            );
        }

        Ok(post)
    }

    /// The built-in placeholder served when a site exists but the
    /// requested page does not
    pub fn coming_soon_page(site: &SiteRef) -> Page {
        let now = Utc::now();
        Page {
            id: Uuid::nil(),
            site_id: site.id,
            slug: "home".to_string(),
            title: "Coming soon".to_string(),
            status: PublishStatus::Published,
            layout: serde_json::json!([
                {
                    "blockType": "callToAction",
                    "heading": "Coming soon",
                    "body": "This site is being set up. Check back shortly.",
                }
            ]),
            seo: Seo {
                title: Some("Coming soon".to_string()),
                description: None,
            },
            created_at: now,
            updated_at: now,
        }
    }
}
