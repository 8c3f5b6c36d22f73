/**
 * Content Path Generator
 *
 * Pure mapping from (collection, slug, site slug, addressing mode) to a
 * canonical URL path, plus the inverse used by the host/path resolver.
 *
 * The same function is called when generating links and sitemaps and
 * when computing which literal paths to invalidate on content change.
 * Any drift between "path used to render" and "path used to invalidate"
 * causes stale-cache bugs, so everything here is side-effect free:
 * identical inputs always yield identical output.
 */

use serde::{Deserialize, Serialize};

/// Fixed literal segment prefixing site-scoped paths internally
pub const SITE_PATH_PREFIX: &str = "/sites";

/// The empty-path sentinel: a page with this slug lives at the site root
pub const HOME_SLUG: &str = "home";

/// Whether site identity is encoded in the hostname or the URL path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressingMode {
    /// Production traffic: `<slug>.<root-domain>` disambiguates, so
    /// generated paths omit the site prefix
    Subdomain,
    /// Local development or explicit override: paths carry
    /// `/sites/<slug>` so a single hostname can serve every site
    PathPrefix,
}

/// The collection a content path addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Page-like content; the default, omits the collection segment
    Page,
    /// Post-like content; paths include a `posts` segment
    Post,
}

impl ContentKind {
    /// The path segment this collection contributes, if any
    pub fn collection_segment(&self) -> Option<&'static str> {
        match self {
            Self::Page => None,
            Self::Post => Some("posts"),
        }
    }
}

/// Generate the canonical path for a piece of content
///
/// - `slug` is split on `/`, each segment trimmed, empty segments
///   dropped; a bare `home` for pages collapses to no segments.
/// - `site_slug` is prepended as `/sites/<slug>` only in path-prefix
///   mode (and only when present).
/// - Output is always absolute, with no trailing slash except the bare
///   root.
pub fn content_path(
    kind: ContentKind,
    slug: &str,
    site_slug: Option<&str>,
    mode: AddressingMode,
) -> String {
    let mut segments: Vec<&str> = Vec::new();

    if let Some(site) = site_slug {
        if mode == AddressingMode::PathPrefix && !site.is_empty() {
            segments.push("sites");
            segments.push(site);
        }
    }

    if let Some(collection) = kind.collection_segment() {
        segments.push(collection);
    }

    let mut slug_segments: Vec<&str> = slug
        .split('/')
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .collect();

    if kind == ContentKind::Page && slug_segments == [HOME_SLUG] {
        slug_segments.clear();
    }

    segments.extend(slug_segments);

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// A content path decomposed back into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContentPath {
    pub kind: ContentKind,
    pub slug: String,
    pub site_slug: Option<String>,
}

/// Split a path-prefixed request path into (site slug, remaining path)
///
/// `/sites/acme/about` yields `("acme", "/about")`; `/sites/acme` yields
/// `("acme", "")`. Returns `None` when the path is not under the site
/// prefix.
pub fn split_site_prefix(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix(SITE_PATH_PREFIX)?;
    let rest = rest.strip_prefix('/')?;

    match rest.find('/') {
        Some(idx) => {
            let (slug, remainder) = rest.split_at(idx);
            if slug.is_empty() {
                None
            } else {
                Some((slug, remainder))
            }
        }
        None => {
            if rest.is_empty() {
                None
            } else {
                Some((rest, ""))
            }
        }
    }
}

/// Parse a canonical content path back into (kind, slug, site slug)
///
/// This is the inverse of `content_path` under the resolver's rewrite
/// rules for the given mode. Post paths win over hierarchical page
/// slugs whose first segment is `posts`, matching route precedence.
pub fn parse_content_path(path: &str, mode: AddressingMode) -> Option<ParsedContentPath> {
    let (site_slug, rest) = match mode {
        AddressingMode::PathPrefix => {
            let (slug, rest) = split_site_prefix(path)?;
            (Some(slug.to_string()), rest)
        }
        AddressingMode::Subdomain => (None, path),
    };

    let segments: Vec<&str> = rest
        .split('/')
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        return Some(ParsedContentPath {
            kind: ContentKind::Page,
            slug: HOME_SLUG.to_string(),
            site_slug,
        });
    }

    if segments[0] == "posts" && segments.len() > 1 {
        return Some(ParsedContentPath {
            kind: ContentKind::Post,
            slug: segments[1..].join("/"),
            site_slug,
        });
    }

    Some(ParsedContentPath {
        kind: ContentKind::Page,
        slug: segments.join("/"),
        site_slug,
    })
}

/// Build the absolute base URL for a site under the current mode
///
/// Subdomain mode addresses the site as `https://<slug>.<root-domain>`;
/// path-prefix mode appends `/sites/<slug>` to the application URL.
pub fn site_url(site_slug: &str, mode: AddressingMode, app_url: &str, root_domain: &str) -> String {
    match mode {
        AddressingMode::Subdomain if !root_domain.is_empty() => {
            format!("https://{}.{}", site_slug, root_domain)
        }
        _ => format!(
            "{}{}/{}",
            app_url.trim_end_matches('/'),
            SITE_PATH_PREFIX,
            site_slug
        ),
    }
}

/// Build the absolute URL for a piece of content (sitemap entries,
/// in-page links that must survive copy-paste)
pub fn absolute_content_url(
    kind: ContentKind,
    slug: &str,
    site_slug: &str,
    mode: AddressingMode,
    app_url: &str,
    root_domain: &str,
) -> String {
    match mode {
        AddressingMode::Subdomain if !root_domain.is_empty() => {
            let base = site_url(site_slug, mode, app_url, root_domain);
            let path = content_path(kind, slug, None, AddressingMode::Subdomain);
            if path == "/" {
                base
            } else {
                format!("{}{}", base, path)
            }
        }
        _ => {
            let path = content_path(kind, slug, Some(site_slug), AddressingMode::PathPrefix);
            format!("{}{}", app_url.trim_end_matches('/'), path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_collapses_prefixed() {
        assert_eq!(
            content_path(ContentKind::Page, "home", Some("acme"), AddressingMode::PathPrefix),
            "/sites/acme"
        );
    }

    #[test]
    fn test_home_collapses_unprefixed() {
        assert_eq!(
            content_path(ContentKind::Page, "home", Some("acme"), AddressingMode::Subdomain),
            "/"
        );
    }

    #[test]
    fn test_page_path_prefixed() {
        assert_eq!(
            content_path(ContentKind::Page, "about", Some("acme"), AddressingMode::PathPrefix),
            "/sites/acme/about"
        );
    }

    #[test]
    fn test_post_path_includes_collection_segment() {
        assert_eq!(
            content_path(ContentKind::Post, "hello", Some("acme"), AddressingMode::PathPrefix),
            "/sites/acme/posts/hello"
        );
        assert_eq!(
            content_path(ContentKind::Post, "hello", Some("acme"), AddressingMode::Subdomain),
            "/posts/hello"
        );
    }

    #[test]
    fn test_hierarchical_slug_segments_are_cleaned() {
        assert_eq!(
            content_path(
                ContentKind::Page,
                " docs / getting-started //",
                Some("acme"),
                AddressingMode::PathPrefix
            ),
            "/sites/acme/docs/getting-started"
        );
    }

    #[test]
    fn test_missing_site_slug_omits_prefix() {
        assert_eq!(
            content_path(ContentKind::Page, "about", None, AddressingMode::PathPrefix),
            "/about"
        );
    }

    #[test]
    fn test_split_site_prefix() {
        assert_eq!(split_site_prefix("/sites/acme/about"), Some(("acme", "/about")));
        assert_eq!(split_site_prefix("/sites/acme"), Some(("acme", "")));
        assert_eq!(split_site_prefix("/sites/"), None);
        assert_eq!(split_site_prefix("/about"), None);
    }

    #[test]
    fn test_parse_round_trip_home() {
        let parsed =
            parse_content_path("/sites/acme", AddressingMode::PathPrefix).unwrap();
        assert_eq!(parsed.kind, ContentKind::Page);
        assert_eq!(parsed.slug, "home");
        assert_eq!(parsed.site_slug.as_deref(), Some("acme"));
    }

    #[test]
    fn test_parse_post_path() {
        let parsed =
            parse_content_path("/sites/acme/posts/hello", AddressingMode::PathPrefix).unwrap();
        assert_eq!(parsed.kind, ContentKind::Post);
        assert_eq!(parsed.slug, "hello");
    }

    #[test]
    fn test_parse_subdomain_mode_has_no_site() {
        let parsed = parse_content_path("/about", AddressingMode::Subdomain).unwrap();
        assert_eq!(parsed.kind, ContentKind::Page);
        assert_eq!(parsed.slug, "about");
        assert_eq!(parsed.site_slug, None);
    }

    #[test]
    fn test_site_url_subdomain() {
        assert_eq!(
            site_url("acme", AddressingMode::Subdomain, "http://localhost:3000", "example.com"),
            "https://acme.example.com"
        );
    }

    #[test]
    fn test_site_url_path_prefix() {
        assert_eq!(
            site_url("acme", AddressingMode::PathPrefix, "http://localhost:3000/", ""),
            "http://localhost:3000/sites/acme"
        );
    }

    #[test]
    fn test_absolute_content_url() {
        assert_eq!(
            absolute_content_url(
                ContentKind::Post,
                "hello",
                "acme",
                AddressingMode::Subdomain,
                "https://app.example.com",
                "example.com"
            ),
            "https://acme.example.com/posts/hello"
        );
        assert_eq!(
            absolute_content_url(
                ContentKind::Page,
                "home",
                "acme",
                AddressingMode::PathPrefix,
                "http://localhost:3000",
                ""
            ),
            "http://localhost:3000/sites/acme"
        );
    }
}
