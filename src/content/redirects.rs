/**
 * Redirect Lookup
 *
 * Consulted only after a page lookup misses, so the happy path never
 * pays for it. Lookups are cached per source path; destinations that
 * point at content are resolved through the path generator so they
 * stay correct across addressing modes.
 */

use crate::content::{tags, ContentService};
use crate::error::AppError;
use crate::store::models::{Redirect, RedirectTarget};
use crate::tenancy::paths::{content_path, AddressingMode};

impl ContentService {
    /// Look up a redirect by its source path
    pub async fn get_redirect(&self, from_path: &str) -> Result<Option<Redirect>, AppError> {
        let key = format!("redirect:{}", from_path);
        if let Some(redirect) = self.cache().get_as::<Redirect>(&key) {
            return Ok(Some(redirect));
        }

        let redirect = self.store().find_redirect(from_path).await?;

        if let Some(redirect) = &redirect {
            self.cache().put(
                key,
                serde_json::to_value(redirect)?,
                &[
                    tags::REDIRECTS.to_string(),
                    tags::redirect_tag(from_path),
                ],
            );
        }

        Ok(redirect)
    }
}

/// Resolve a redirect's destination to a concrete location
///
/// URL targets pass through untouched; content targets go through the
/// path generator under the current addressing mode.
pub fn redirect_destination(redirect: &Redirect, mode: AddressingMode) -> String {
    match &redirect.to {
        RedirectTarget::Url { url } => url.clone(),
        RedirectTarget::Content {
            kind,
            site_slug,
            slug,
        } => content_path(*kind, slug, Some(site_slug), mode),
    }
}
