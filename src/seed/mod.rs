/**
 * Seed Module
 *
 * Provisions a freshly registered site with starter content: two
 * categories, a contact form, three published pages, two cross-linked
 * posts, and default navigation.
 *
 * The pipeline is idempotent by convention: every document it creates
 * carries a slug (or notification address, for forms) derived from the
 * site slug, and each run purges its own previous output before
 * recreating it. Documents the operator created by hand are never
 * touched.
 *
 * Writes run under the transient-failure retry policy, with
 * per-document revalidation suppressed; a single consolidated
 * site-level invalidation is returned for the caller to dispatch once
 * the seed has fully landed.
 */

pub mod retry;
pub mod templates;

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::cache::Invalidation;
use crate::error::AppError;
use crate::revalidate::{revalidate_site, MutationContext};
use crate::store::models::{Category, NavKind, Site};
use crate::store::ContentStore;
use crate::tenancy::paths::AddressingMode;
use crate::tenancy::slug::to_slug;

use retry::with_retry;
use templates::{
    contact_form, contact_page, default_navigation, home_page, posts_page, seed_notification_email,
    seed_post_slugs, seed_posts, BusinessDetails, BusinessOverrides, CONTACT_SLUG,
    POSTS_PAGE_SLUG, SEED_CATEGORY_TITLES,
};

/// What a seed run created and removed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub pages_created: usize,
    pub posts_created: usize,
    pub categories_created: usize,
    pub forms_created: usize,
    pub navigations_created: usize,
    pub documents_purged: u64,
    /// Consolidated invalidation to dispatch after the seed lands
    pub invalidations: Vec<Invalidation>,
}

/// Remove every document a previous seed run created for this site
async fn purge_previous_seed(
    store: &Arc<dyn ContentStore>,
    site: &Site,
) -> Result<u64, AppError> {
    let mut purged = 0u64;

    for slug in ["home", CONTACT_SLUG, POSTS_PAGE_SLUG] {
        purged += with_retry("purge pages", || store.delete_pages_by_slug(site.id, slug)).await?;
    }

    for slug in seed_post_slugs(&site.slug) {
        purged +=
            with_retry("purge posts", || store.delete_posts_by_slug(site.id, &slug)).await?;
    }

    for title in SEED_CATEGORY_TITLES {
        let slug = to_slug(title);
        purged += with_retry("purge categories", || {
            store.delete_categories_by_slug(site.id, &slug)
        })
        .await?;
    }

    // Forms have no slug; the seeded one is identified by its
    // notification address.
    let seeded_email = seed_notification_email(&site.slug);
    for form in store.list_forms(site.id).await? {
        if form.notification_email.as_deref() == Some(seeded_email.as_str()) {
            with_retry("purge form", || store.delete_form(form.id)).await?;
            purged += 1;
        }
    }

    Ok(purged)
}

/// Seed a site with starter content
///
/// Safe to run repeatedly; see the module docs for the idempotency
/// contract.
pub async fn seed_site(
    store: &Arc<dyn ContentStore>,
    site: &Site,
    mode: AddressingMode,
    business: &BusinessOverrides,
) -> Result<SeedReport, AppError> {
    let now = Utc::now();
    let mut report = SeedReport::default();

    tracing::info!("— Seeding starter content for site '{}'", site.slug);

    report.documents_purged = purge_previous_seed(store, site).await?;
    if report.documents_purged > 0 {
        tracing::info!(
            "— Purged {} documents from a previous seed",
            report.documents_purged
        );
    }

    // Categories first so posts can reference them.
    let mut categories: Vec<Category> = Vec::new();
    for title in SEED_CATEGORY_TITLES {
        let category = Category {
            id: Uuid::new_v4(),
            site_id: site.id,
            slug: to_slug(title),
            title: (*title).to_string(),
            created_at: now,
        };
        with_retry("create category", || store.create_category(&category)).await?;
        categories.push(category);
        report.categories_created += 1;
    }
    tracing::info!("— Seeded {} categories", report.categories_created);

    let form = contact_form(site, now);
    with_retry("create form", || store.create_form(&form)).await?;
    report.forms_created += 1;

    // Posts before pages so the listing page has something to show.
    let posts = seed_posts(site, &categories, mode, now);
    for post in &posts {
        with_retry("create post", || store.create_post(post)).await?;
        report.posts_created += 1;
    }

    // Cross-link the starter posts as related to each other. The id
    // slices must outlive the retry closures, which may re-run.
    if let [first, second] = posts.as_slice() {
        let first_related = [second.id];
        let second_related = [first.id];
        with_retry("relate posts", || {
            store.set_related_posts(first.id, &first_related)
        })
        .await?;
        with_retry("relate posts", || {
            store.set_related_posts(second.id, &second_related)
        })
        .await?;
    }
    tracing::info!("— Seeded {} posts", report.posts_created);

    let details = BusinessDetails::with_overrides(site, business);
    let pages = [
        home_page(site, &details, mode, now),
        contact_page(site, &details, &form, now),
        posts_page(site, now),
    ];
    for page in &pages {
        with_retry("create page", || store.create_page(page)).await?;
        report.pages_created += 1;
    }
    tracing::info!("— Seeded {} pages", report.pages_created);

    // Navigation is only created when absent: operators may have
    // customized theirs, and purging it would lose that work.
    for kind in [NavKind::Header, NavKind::Footer] {
        if store.find_navigation(site.id, kind).await?.is_none() {
            let navigation = default_navigation(site, kind, mode, now);
            with_retry("create navigation", || store.create_navigation(&navigation)).await?;
            report.navigations_created += 1;
        }
    }

    report.invalidations = revalidate_site(&site.slug, None, MutationContext::default());

    tracing::info!("— Seeded site '{}' successfully", site.slug);
    Ok(report)
}
