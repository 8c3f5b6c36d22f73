/**
 * Content Models
 *
 * Document shapes for the collections the builder manages. Only the
 * fields the routing, revalidation, and seeding subsystems read are
 * modeled; block payloads stay opaque JSON.
 *
 * Ownership model: a Tenant (billing/account entity) owns N Sites; a
 * Site (routable, brandable unit) owns Pages, Posts, Categories, Forms,
 * and one Header/Footer. Path generation and revalidation depend only
 * on `SiteRef`, never on the concrete entities.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tenancy::paths::ContentKind;

/// The owning-entity seam: just enough of a site to route and tag by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRef {
    pub id: Uuid,
    pub slug: String,
}

/// Tenant lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "tenant_status", rename_all = "lowercase")]
pub enum TenantStatus {
    Pending,
    Draft,
    Active,
    Suspended,
}

/// Site lifecycle status; only active sites are exposed publicly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "site_status", rename_all = "lowercase")]
pub enum SiteStatus {
    Draft,
    Active,
    Suspended,
    Archived,
}

/// Publication status gating public visibility of pages and posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "publish_status", rename_all = "lowercase")]
pub enum PublishStatus {
    Draft,
    Published,
}

/// A billing/account-level entity that owns one or more sites
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    pub id: Uuid,
    /// Globally unique, DNS-label constrained
    pub slug: String,
    pub name: String,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional branding controls for a site
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
}

/// A routable, brandable unit of content within a tenant
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Site {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Globally unique, DNS-label constrained, reserved words excluded
    pub slug: String,
    pub name: String,
    pub status: SiteStatus,
    #[sqlx(json)]
    pub branding: Branding,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    /// The routing/tagging view of this site
    pub fn site_ref(&self) -> SiteRef {
        SiteRef {
            id: self.id,
            slug: self.slug.clone(),
        }
    }
}

/// SEO metadata carried by pages and posts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A block-based page; `slug` may be hierarchical (slash-joined)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Page {
    pub id: Uuid,
    pub site_id: Uuid,
    /// Unique within the owning site; "home" is the empty-path sentinel
    pub slug: String,
    pub title: String,
    pub status: PublishStatus,
    /// Hero plus ordered block layout, opaque to the backend
    #[sqlx(json)]
    pub layout: serde_json::Value,
    #[sqlx(json)]
    pub seo: Seo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    pub fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }
}

/// A post: page shape minus hero/layout, plus categories and
/// same-site related posts
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub site_id: Uuid,
    pub slug: String,
    pub title: String,
    pub status: PublishStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[sqlx(json)]
    pub body: serde_json::Value,
    pub categories: Vec<Uuid>,
    pub related_posts: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }
}

/// A post category, scoped to a site
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub site_id: Uuid,
    pub slug: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A form document (e.g. the seeded contact form)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FormDoc {
    pub id: Uuid,
    pub site_id: Uuid,
    pub title: String,
    #[sqlx(json)]
    pub fields: serde_json::Value,
    pub confirmation_message: String,
    pub notification_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Which navigation side document this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "nav_kind", rename_all = "lowercase")]
pub enum NavKind {
    Header,
    Footer,
}

/// One navigation entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub url: String,
}

/// One-per-site header or footer holding navigation items
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Navigation {
    pub id: Uuid,
    pub site_id: Uuid,
    pub kind: NavKind,
    #[sqlx(json)]
    pub items: Vec<NavItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a redirect points
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RedirectTarget {
    /// An absolute external URL
    Url { url: String },
    /// Another page or post, resolved through the path generator
    Content {
        kind: ContentKind,
        site_slug: String,
        slug: String,
    },
}

/// A from-path to destination mapping
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Redirect {
    pub id: Uuid,
    pub from_path: String,
    #[sqlx(json)]
    #[sqlx(rename = "target")]
    pub to: RedirectTarget,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_target_serialization() {
        let target = RedirectTarget::Content {
            kind: ContentKind::Post,
            site_slug: "acme".to_string(),
            slug: "hello".to_string(),
        };
        let json = serde_json::to_string(&target).unwrap();
        assert!(json.contains(r#""type":"content""#));

        let back: RedirectTarget = serde_json::from_str(&json).unwrap();
        match back {
            RedirectTarget::Content { slug, .. } => assert_eq!(slug, "hello"),
            _ => panic!("Expected content target"),
        }
    }

    #[test]
    fn test_publish_status_gates_visibility() {
        let now = Utc::now();
        let page = Page {
            id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            slug: "about".to_string(),
            title: "About".to_string(),
            status: PublishStatus::Draft,
            layout: serde_json::json!([]),
            seo: Seo::default(),
            created_at: now,
            updated_at: now,
        };
        assert!(!page.is_published());
    }
}
