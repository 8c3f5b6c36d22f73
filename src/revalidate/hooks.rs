/**
 * Mutation Hooks
 *
 * One fan-out function per collection. Each returns the complete set of
 * invalidations for a mutation, including the entries the pre-mutation
 * document occupied when it was published under a different slug, site,
 * or status. Missing the previous entries is the classic stale-cache
 * bug: the renamed page keeps serving at its old path forever.
 */

use crate::cache::Invalidation;
use crate::content::tags;
use crate::error::AppError;
use crate::revalidate::{ContentDoc, MutationContext};
use crate::store::ContentStore;
use crate::tenancy::paths::{content_path, AddressingMode, ContentKind};

fn push_unique(out: &mut Vec<Invalidation>, inv: Invalidation) {
    if !out.contains(&inv) {
        out.push(inv);
    }
}

/// The canonical cached path for a document, in the internal
/// path-prefixed form every request is rewritten to
fn doc_path(kind: ContentKind, doc: &ContentDoc) -> Option<String> {
    doc.site_slug()
        .map(|site| content_path(kind, &doc.slug, Some(site), AddressingMode::PathPrefix))
}

fn fan_out_doc(
    out: &mut Vec<Invalidation>,
    kind: ContentKind,
    doc: &ContentDoc,
    sitemap_tag: &str,
) {
    if let Some(path) = doc_path(kind, doc) {
        push_unique(out, Invalidation::path(path));
    }

    if let Some(site) = doc.site_slug() {
        push_unique(out, Invalidation::tag(tags::site_tag(site)));
        let entity_tag = match kind {
            ContentKind::Page => tags::page_tag(site, &doc.slug),
            ContentKind::Post => tags::post_tag(site, &doc.slug),
        };
        push_unique(out, Invalidation::tag(entity_tag));
    }

    let coarse = match kind {
        ContentKind::Page => tags::PAGES,
        ContentKind::Post => tags::POSTS,
    };
    push_unique(out, Invalidation::tag(coarse));
    push_unique(out, Invalidation::tag(sitemap_tag));
}

/// Whether the pre-mutation document occupied cache entries the new
/// document no longer covers
fn previous_needs_fan_out(doc: &ContentDoc, previous: &ContentDoc) -> bool {
    previous.is_published()
        && (!doc.is_published()
            || previous.slug != doc.slug
            || previous.site_slug() != doc.site_slug())
}

fn change_fan_out(
    kind: ContentKind,
    doc: &ContentDoc,
    previous: Option<&ContentDoc>,
    ctx: MutationContext,
    sitemap_tag: &str,
) -> Vec<Invalidation> {
    if ctx.disable_revalidate {
        return Vec::new();
    }

    let mut out = Vec::new();

    if doc.is_published() {
        fan_out_doc(&mut out, kind, doc, sitemap_tag);
    }

    if let Some(previous) = previous {
        if previous_needs_fan_out(doc, previous) {
            fan_out_doc(&mut out, kind, previous, sitemap_tag);
        }
    }

    out
}

/// Fan-out for a page create or update
pub fn revalidate_page(
    doc: &ContentDoc,
    previous: Option<&ContentDoc>,
    ctx: MutationContext,
) -> Vec<Invalidation> {
    change_fan_out(ContentKind::Page, doc, previous, ctx, tags::PAGES_SITEMAP)
}

/// Fan-out for a page delete
pub fn revalidate_page_delete(doc: &ContentDoc, ctx: MutationContext) -> Vec<Invalidation> {
    if ctx.disable_revalidate {
        return Vec::new();
    }
    let mut out = Vec::new();
    fan_out_doc(&mut out, ContentKind::Page, doc, tags::PAGES_SITEMAP);
    out
}

/// Fan-out for a post create or update
pub fn revalidate_post(
    doc: &ContentDoc,
    previous: Option<&ContentDoc>,
    ctx: MutationContext,
) -> Vec<Invalidation> {
    change_fan_out(ContentKind::Post, doc, previous, ctx, tags::POSTS_SITEMAP)
}

/// Fan-out for a post delete
pub fn revalidate_post_delete(doc: &ContentDoc, ctx: MutationContext) -> Vec<Invalidation> {
    if ctx.disable_revalidate {
        return Vec::new();
    }
    let mut out = Vec::new();
    fan_out_doc(&mut out, ContentKind::Post, doc, tags::POSTS_SITEMAP);
    out
}

fn fan_out_site(out: &mut Vec<Invalidation>, slug: &str) {
    push_unique(out, Invalidation::tag(tags::SITES.to_string()));
    // Dropping the site tag removes every cached page, post, sitemap,
    // and rendered route belonging to the site.
    push_unique(out, Invalidation::tag(tags::site_tag(slug)));
    push_unique(
        out,
        Invalidation::path(content_path(
            ContentKind::Page,
            "home",
            Some(slug),
            AddressingMode::PathPrefix,
        )),
    );
}

/// Fan-out for a site create or update
///
/// A slug rename also clears everything cached under the old slug.
pub fn revalidate_site(
    slug: &str,
    previous_slug: Option<&str>,
    ctx: MutationContext,
) -> Vec<Invalidation> {
    if ctx.disable_revalidate {
        return Vec::new();
    }

    let mut out = Vec::new();
    fan_out_site(&mut out, slug);

    if let Some(previous) = previous_slug {
        if previous != slug {
            fan_out_site(&mut out, previous);
        }
    }

    out
}

/// Fan-out for a site delete
pub fn revalidate_site_delete(slug: &str, ctx: MutationContext) -> Vec<Invalidation> {
    if ctx.disable_revalidate {
        return Vec::new();
    }
    let mut out = Vec::new();
    fan_out_site(&mut out, slug);
    out
}

/// Fan-out for a tenant mutation: clears every site the tenant owns
///
/// This is the only hook that reads the store, because the sites are
/// not carried on the tenant document itself.
pub async fn revalidate_tenant(
    store: &dyn ContentStore,
    tenant_id: &str,
    ctx: MutationContext,
) -> Result<Vec<Invalidation>, AppError> {
    if ctx.disable_revalidate {
        return Ok(Vec::new());
    }

    let mut out = vec![Invalidation::tag(tags::TENANTS.to_string())];

    if let Ok(id) = tenant_id.parse::<uuid::Uuid>() {
        for site in store.sites_for_tenant(id).await? {
            fan_out_site(&mut out, &site.slug);
        }
    }

    Ok(out)
}

/// Fan-out for a navigation (header/footer) mutation
///
/// Navigation renders on every page of the site, so the whole site tag
/// goes.
pub fn revalidate_navigation(site_slug: &str, ctx: MutationContext) -> Vec<Invalidation> {
    if ctx.disable_revalidate {
        return Vec::new();
    }
    vec![Invalidation::tag(tags::site_tag(site_slug))]
}

/// Fan-out for a redirect mutation
pub fn revalidate_redirect(from_path: &str, ctx: MutationContext) -> Vec<Invalidation> {
    if ctx.disable_revalidate {
        return Vec::new();
    }
    vec![
        Invalidation::tag(tags::REDIRECTS.to_string()),
        Invalidation::tag(tags::redirect_tag(from_path)),
    ]
}
