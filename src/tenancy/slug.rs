/**
 * Slug Rules
 *
 * Site slugs double as subdomain labels, so they must be DNS-label safe
 * and must not collide with the subdomains the platform itself uses.
 * This module holds the reserved-word list, normalization, validation,
 * and the kebab-case slugifier used by the seeding pipeline.
 */

use crate::error::AppError;

/// Subdomain labels the platform reserves for itself
pub const RESERVED_SLUGS: &[&str] = &[
    "app", "api", "auth", "sites", "www", "admin", "static", "assets",
];

/// Whether a slug is on the reserved list
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Normalize a candidate slug from untrusted input
///
/// Trims, lowercases, and strips every character outside `[a-z0-9-]`.
/// Returns `None` when nothing usable remains.
pub fn normalize_slug(candidate: &str) -> Option<String> {
    let normalized: String = candidate
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Validate a site slug for registration
///
/// Slugs must be 2-63 characters, DNS-label shaped (letters, numbers,
/// and hyphens; starting and ending with a letter or number), and must
/// not be a reserved word.
pub fn validate_site_slug(value: &str) -> Result<(), AppError> {
    let slug = value.trim().to_lowercase();

    if !is_dns_label(&slug) {
        return Err(AppError::validation(
            "Use 2-63 characters: letters, numbers, and hyphens. Start and end with a letter or number.",
        ));
    }

    if is_reserved(&slug) {
        return Err(AppError::validation(format!(
            "\"{}\" is reserved. Choose another slug.",
            slug
        )));
    }

    Ok(())
}

fn is_dns_label(slug: &str) -> bool {
    if slug.len() < 2 || slug.len() > 63 {
        return false;
    }

    let bytes = slug.as_bytes();
    let is_alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();

    if !is_alnum(bytes[0]) || !is_alnum(bytes[bytes.len() - 1]) {
        return false;
    }

    bytes.iter().all(|&b| is_alnum(b) || b == b'-')
}

/// Slugify arbitrary text into kebab case
///
/// Used by the seeding pipeline to derive category slugs from titles.
pub fn to_slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_hyphen = true;

    for c in input.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            out.push('-');
            last_was_hyphen = true;
        }
    }

    out.trim_end_matches('-').to_string()
}
