/**
 * Sitemap Generation
 *
 * Per-site page and post sitemaps built from published documents only.
 * Entry lists are cached per site, tagged with both the sitemap tag and
 * the site tag so a single content change refreshes them.
 */

use serde::{Deserialize, Serialize};

use crate::content::{tags, ContentService};
use crate::error::AppError;
use crate::tenancy::paths::{absolute_content_url, AddressingMode, ContentKind};

/// One `<url>` element of a sitemap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
}

/// URL-building context for absolute sitemap locations
#[derive(Debug, Clone)]
pub struct UrlContext {
    pub mode: AddressingMode,
    pub app_url: String,
    pub root_domain: String,
}

impl ContentService {
    /// Published page entries for one site's sitemap
    ///
    /// An unknown site yields an empty list, matching the empty-but-valid
    /// sitemap the route serves.
    pub async fn pages_sitemap_entries(
        &self,
        site_slug: &str,
        urls: &UrlContext,
    ) -> Result<Vec<SitemapEntry>, AppError> {
        let key = format!("pages-sitemap:{}", site_slug);
        if let Some(entries) = self.cache().get_as::<Vec<SitemapEntry>>(&key) {
            return Ok(entries);
        }

        let entries = match self.get_site(site_slug, false).await? {
            Some(site) => {
                let pages = self.store().list_published_pages(site.id).await?;
                pages
                    .iter()
                    .map(|page| SitemapEntry {
                        loc: absolute_content_url(
                            ContentKind::Page,
                            &page.slug,
                            site_slug,
                            urls.mode,
                            &urls.app_url,
                            &urls.root_domain,
                        ),
                        lastmod: page.updated_at.to_rfc3339(),
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        self.cache().put(
            key,
            serde_json::to_value(&entries)?,
            &[
                tags::PAGES_SITEMAP.to_string(),
                tags::site_tag(site_slug),
            ],
        );

        Ok(entries)
    }

    /// Published post entries for one site's sitemap
    pub async fn posts_sitemap_entries(
        &self,
        site_slug: &str,
        urls: &UrlContext,
    ) -> Result<Vec<SitemapEntry>, AppError> {
        let key = format!("posts-sitemap:{}", site_slug);
        if let Some(entries) = self.cache().get_as::<Vec<SitemapEntry>>(&key) {
            return Ok(entries);
        }

        let entries = match self.get_site(site_slug, false).await? {
            Some(site) => {
                let posts = self.store().list_published_posts(site.id).await?;
                posts
                    .iter()
                    .map(|post| SitemapEntry {
                        loc: absolute_content_url(
                            ContentKind::Post,
                            &post.slug,
                            site_slug,
                            urls.mode,
                            &urls.app_url,
                            &urls.root_domain,
                        ),
                        lastmod: post.updated_at.to_rfc3339(),
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        self.cache().put(
            key,
            serde_json::to_value(&entries)?,
            &[
                tags::POSTS_SITEMAP.to_string(),
                tags::site_tag(site_slug),
            ],
        );

        Ok(entries)
    }
}

/// Render entries as a sitemap XML document
pub fn sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::with_capacity(256 + entries.len() * 128);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&entry.loc)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            xml_escape(&entry.lastmod)
        ));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_xml_shape() {
        let entries = vec![
            SitemapEntry {
                loc: "https://acme.example.com".to_string(),
                lastmod: "2025-01-01T00:00:00+00:00".to_string(),
            },
            SitemapEntry {
                loc: "https://acme.example.com/about".to_string(),
                lastmod: "2025-01-02T00:00:00+00:00".to_string(),
            },
        ];

        let xml = sitemap_xml(&entries);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<loc>https://acme.example.com/about</loc>"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_empty_sitemap_is_valid() {
        let xml = sitemap_xml(&[]);
        assert!(xml.contains("<urlset"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_loc_is_escaped() {
        let entries = vec![SitemapEntry {
            loc: "https://a.example.com/q?a=1&b=2".to_string(),
            lastmod: "2025-01-01T00:00:00+00:00".to_string(),
        }];
        assert!(sitemap_xml(&entries).contains("a=1&amp;b=2"));
    }
}
