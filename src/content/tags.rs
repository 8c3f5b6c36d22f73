/**
 * Cache Tag Vocabulary
 *
 * Every tag attached by a cached read must be reproducible by the
 * revalidation fan-out, so the builders live in one place and both
 * sides call them.
 */

/// All cached sites
pub const SITES: &str = "sites";
/// All cached tenant-derived entries
pub const TENANTS: &str = "tenants";
/// All cached pages, across sites
pub const PAGES: &str = "pages";
/// All cached posts, across sites
pub const POSTS: &str = "posts";
/// All cached redirect lookups
pub const REDIRECTS: &str = "redirects";
/// Cached page sitemaps
pub const PAGES_SITEMAP: &str = "pages-sitemap";
/// Cached post sitemaps
pub const POSTS_SITEMAP: &str = "posts-sitemap";

/// Everything belonging to one site
pub fn site_tag(site_slug: &str) -> String {
    format!("site:{}", site_slug)
}

/// One page within a site
pub fn page_tag(site_slug: &str, slug: &str) -> String {
    format!("site:{}:page:{}", site_slug, slug)
}

/// One post within a site
pub fn post_tag(site_slug: &str, slug: &str) -> String {
    format!("site:{}:post:{}", site_slug, slug)
}

/// One redirect source path
pub fn redirect_tag(from_path: &str) -> String {
    format!("redirect:{}", from_path)
}
