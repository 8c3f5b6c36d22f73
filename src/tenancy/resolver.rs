/**
 * Host/Path Resolver
 *
 * Axum middleware that inspects each inbound request's hostname and
 * rewrites the request to the canonical internal path, attaching the
 * resolved site identity as a request header.
 *
 * This runs on the hot path for every request including static assets,
 * so it is restricted to synchronous string and hostname parsing - no
 * database lookups, no I/O.
 *
 * # Per-request state machine
 *
 * 1. Bypass list (static assets, API routes) - pass through unchanged.
 * 2. Determine the candidate site slug: on loopback hostnames an
 *    explicit `__subdomain` query override wins (and is persisted to a
 *    cookie), else a `<slug>.localhost` label, else the cookie. On
 *    production hostnames the leftmost subdomain label of the root
 *    domain, unless reserved.
 * 3. No slug - forward unmodified, still stamping the original
 *    hostname onto an internal header.
 * 4. Slug resolved and path not yet prefixed - rewrite to
 *    `/sites/<slug><path>` (query preserved minus the override param)
 *    and stamp the slug header.
 * 5. Slug resolved and path already prefixed - pass through with
 *    headers stamped.
 */

use std::collections::HashSet;

use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, HOST, SET_COOKIE},
        HeaderValue, Uri,
    },
    middleware::Next,
    response::Response,
};

use crate::server::state::AppState;
use crate::tenancy::paths::{split_site_prefix, AddressingMode, SITE_PATH_PREFIX};
use crate::tenancy::slug::{normalize_slug, RESERVED_SLUGS};

/// Header carrying the resolved site slug to downstream handlers
pub const SITE_SLUG_HEADER: &str = "x-site-slug";

/// Header carrying the hostname as received, pre-rewrite
pub const ORIGINAL_HOSTNAME_HEADER: &str = "x-original-hostname";

/// Development-only query parameter forcing a site slug
pub const DEV_SUBDOMAIN_PARAM: &str = "__subdomain";

/// Development-only cookie pinning the last resolved slug
pub const DEV_SUBDOMAIN_COOKIE: &str = "__site_subdomain";

/// File extensions never routed through site resolution
const BYPASS_EXTENSIONS: &[&str] = &[
    ".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp", ".ico", ".txt", ".xml", ".js", ".css",
    ".map",
];

/// Static configuration the resolver needs per request
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub mode: AddressingMode,
    /// Bare root domain (no port), empty when unconfigured
    pub root_domain: String,
    /// Subdomain labels that never resolve to a site
    pub reserved: HashSet<String>,
}

impl ResolverConfig {
    pub fn new(mode: AddressingMode, root_domain: &str, app_hostname: &str) -> Self {
        let root_domain = root_domain
            .split(':')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        let mut reserved: HashSet<String> =
            RESERVED_SLUGS.iter().map(|s| s.to_string()).collect();

        // The app's own hostname label must never resolve to a site.
        if !root_domain.is_empty() {
            if let Some(label) = app_hostname
                .to_lowercase()
                .strip_suffix(&format!(".{}", root_domain))
            {
                if !label.is_empty() && !label.contains('.') {
                    reserved.insert(label.to_string());
                }
            }
        }

        Self {
            mode,
            root_domain,
            reserved,
        }
    }
}

/// What the slug detection decided for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub slug: Option<String>,
    pub cookie: CookieAction,
}

/// Whether the development cookie should be written on the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieAction {
    None,
    Set(String),
    Clear,
}

/// Whether a path skips site resolution entirely
pub fn should_bypass(path: &str) -> bool {
    if path.is_empty() {
        return true;
    }
    let lowered = path.to_lowercase();
    if BYPASS_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext)) {
        return true;
    }
    path.starts_with("/api") || path.starts_with("/static") || path.starts_with("/_internal")
}

/// Lowercased hostname with any port stripped
pub fn hostname_of(host: &str) -> String {
    let host = host.trim().to_lowercase();
    // Bracketed IPv6 literals keep their brackets, lose the port.
    if let Some(rest) = host.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return format!("[{}]", &rest[..end]);
        }
    }
    host.split(':').next().unwrap_or_default().to_string()
}

fn is_loopback(hostname: &str) -> bool {
    hostname == "localhost"
        || hostname == "127.0.0.1"
        || hostname == "[::1]"
        || hostname.ends_with(".localhost")
}

/// Find a query parameter's value without allocating the whole map
pub fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == name {
            Some(value)
        } else {
            None
        }
    })
}

/// The query string with one parameter removed
pub fn strip_query_param(query: &str, name: &str) -> String {
    query
        .split('&')
        .filter(|pair| {
            let key = pair.split_once('=').map(|(k, _)| k).unwrap_or(pair);
            !pair.is_empty() && key != name
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Read one cookie's value from a `Cookie` header
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name {
            Some(value)
        } else {
            None
        }
    })
}

/// Decide the candidate site slug for a request
///
/// Pure string inspection; the middleware wraps this with the actual
/// request rewrite.
pub fn detect_site_slug(
    hostname: &str,
    query: &str,
    cookie_header: Option<&str>,
    config: &ResolverConfig,
) -> Detection {
    if is_loopback(hostname) {
        if let Some(provided) = query_param(query, DEV_SUBDOMAIN_PARAM) {
            let slug = normalize_slug(provided);
            let cookie = match &slug {
                Some(slug) => CookieAction::Set(slug.clone()),
                None => CookieAction::Clear,
            };
            return Detection { slug, cookie };
        }

        // Support dev hostnames like <slug>.localhost
        if let Some(label) = hostname.strip_suffix(".localhost") {
            return Detection {
                slug: normalize_slug(label),
                cookie: CookieAction::None,
            };
        }

        let slug = cookie_header
            .and_then(|header| cookie_value(header, DEV_SUBDOMAIN_COOKIE))
            .and_then(normalize_slug);
        return Detection {
            slug,
            cookie: CookieAction::None,
        };
    }

    if !config.root_domain.is_empty() {
        if hostname == config.root_domain {
            return Detection {
                slug: None,
                cookie: CookieAction::None,
            };
        }

        if let Some(label) = hostname.strip_suffix(&format!(".{}", config.root_domain)) {
            if !label.is_empty() && !label.contains('.') && !config.reserved.contains(label) {
                return Detection {
                    slug: normalize_slug(label),
                    cookie: CookieAction::None,
                };
            }
        }
    }

    Detection {
        slug: None,
        cookie: CookieAction::None,
    }
}

/// The host/path resolver middleware
///
/// In path-prefix mode requests already address sites through the URL,
/// so only the original-hostname header is stamped. In subdomain mode
/// the full detection and rewrite runs.
pub async fn resolve_site(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let config = &state.resolver;

    let original_host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();

    stamp_header(&mut request, ORIGINAL_HOSTNAME_HEADER, &original_host);

    if config.mode == AddressingMode::PathPrefix {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();

    if should_bypass(&path) {
        return next.run(request).await;
    }

    let hostname = hostname_of(&original_host);
    let query = request.uri().query().unwrap_or_default().to_string();
    let cookie_header = request
        .headers()
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let detection = detect_site_slug(&hostname, &query, cookie_header.as_deref(), config);

    let response = match &detection.slug {
        None => next.run(request).await,
        Some(slug) => {
            stamp_header(&mut request, SITE_SLUG_HEADER, slug);

            if split_site_prefix(&path).is_some() {
                // Already canonical; nothing to rewrite.
                next.run(request).await
            } else {
                rewrite_to_site_path(&mut request, slug, &path, &query);
                next.run(request).await
            }
        }
    };

    apply_cookie_action(response, &detection.cookie)
}

fn stamp_header(request: &mut Request, name: &'static str, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(header) => {
            request.headers_mut().insert(name, header);
        }
        Err(_) => {
            tracing::warn!("Skipping non-ASCII header value for {}", name);
        }
    }
}

fn rewrite_to_site_path(request: &mut Request, slug: &str, path: &str, query: &str) {
    let append_path = if path == "/" { "" } else { path };
    let forwarded_query = strip_query_param(query, DEV_SUBDOMAIN_PARAM);

    let mut target = format!("{}/{}{}", SITE_PATH_PREFIX, slug, append_path);
    if !forwarded_query.is_empty() {
        target.push('?');
        target.push_str(&forwarded_query);
    }

    match target.parse::<Uri>() {
        Ok(uri) => {
            tracing::debug!("Rewriting {} to {}", path, uri);
            *request.uri_mut() = uri;
        }
        Err(err) => {
            tracing::warn!("Failed to build rewrite URI for {}: {}", path, err);
        }
    }
}

fn apply_cookie_action(mut response: Response, action: &CookieAction) -> Response {
    let cookie = match action {
        CookieAction::None => return response,
        CookieAction::Set(slug) => format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            DEV_SUBDOMAIN_COOKIE, slug
        ),
        CookieAction::Clear => format!(
            "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
            DEV_SUBDOMAIN_COOKIE
        ),
    };

    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }

    response
}
