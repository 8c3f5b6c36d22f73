/**
 * Revalidation Module
 *
 * Computes cache invalidation fan-out for content mutations. Hooks are
 * pure: they take the mutated document (and the pre-mutation snapshot
 * where relevant) and return the list of instructions; the dispatcher
 * in `crate::cache` applies them.
 *
 * Literal paths are always generated in path-prefix form, because the
 * resolver rewrites every request onto `/sites/<slug>/...` before it is
 * rendered and cached. The hostname a visitor used never appears in a
 * cache key.
 */

pub mod hooks;

use serde::{Deserialize, Serialize};

use crate::store::models::PublishStatus;
use crate::tenancy::reference::SiteReference;

pub use hooks::{
    revalidate_navigation, revalidate_page, revalidate_page_delete, revalidate_post,
    revalidate_post_delete, revalidate_redirect, revalidate_site, revalidate_site_delete,
    revalidate_tenant,
};

/// Per-mutation flags carried alongside a write
///
/// Bulk operations (seeding) set `disable_revalidate` so per-document
/// hooks stay quiet and a single consolidated invalidation runs at the
/// end.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationContext {
    pub disable_revalidate: bool,
}

impl MutationContext {
    pub fn suppressed() -> Self {
        Self {
            disable_revalidate: true,
        }
    }
}

/// The document shape mutation events carry
///
/// Events arrive as webhook-style JSON: ids are opaque strings and the
/// owning site may be an id, a slug-bearing document, or absent
/// entirely, so it is decoded through `SiteReference`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDoc {
    pub id: String,
    pub slug: String,
    pub status: PublishStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteReference>,
}

impl ContentDoc {
    pub fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }

    /// The owning site's slug, when the reference carries one
    pub fn site_slug(&self) -> Option<&str> {
        self.site.as_ref().and_then(|site| site.extract_slug())
    }
}
