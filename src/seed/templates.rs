/**
 * Starter Content Templates
 *
 * Builders for the documents a freshly provisioned site receives. All
 * slugs are derived from the site slug so repeated seeding can find and
 * purge its own output, and every in-content link goes through the path
 * generator so templates work under either addressing mode.
 */

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::store::models::{
    Category, FormDoc, NavItem, NavKind, Navigation, Page, Post, PublishStatus, Seo, Site,
};
use crate::tenancy::paths::{content_path, AddressingMode, ContentKind};

/// Category titles every starter site receives
pub const SEED_CATEGORY_TITLES: &[&str] = &["Product updates", "Customer spotlights"];

/// Slug of the seeded contact page
pub const CONTACT_SLUG: &str = "contact";
/// Slug of the seeded posts listing page
pub const POSTS_PAGE_SLUG: &str = "posts";

/// Optional business facts a caller can supply when seeding
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessOverrides {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub primary_goal: Option<String>,
}

/// The business facts woven into the starter copy
#[derive(Debug, Clone)]
pub struct BusinessDetails {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub contact_email: String,
}

impl BusinessDetails {
    /// Defaults derived from the site itself
    pub fn for_site(site: &Site) -> Self {
        Self {
            name: site.name.clone(),
            tagline: format!("Welcome to {}", site.name),
            description: format!(
                "{} is just getting started. This page was generated for you; make it yours.",
                site.name
            ),
            contact_email: seed_notification_email(&site.slug),
        }
    }

    /// Site defaults with any caller-supplied facts layered on top
    pub fn with_overrides(site: &Site, overrides: &BusinessOverrides) -> Self {
        let mut details = Self::for_site(site);

        if let Some(name) = &overrides.name {
            if !name.trim().is_empty() {
                details.name = name.trim().to_string();
                details.tagline = format!("Welcome to {}", details.name);
            }
        }
        if let Some(goal) = &overrides.primary_goal {
            if !goal.trim().is_empty() {
                details.tagline = goal.trim().to_string();
            }
        }
        if let Some(description) = &overrides.description {
            if !description.trim().is_empty() {
                details.description = description.trim().to_string();
            }
        }
        if let Some(audience) = &overrides.audience {
            if !audience.trim().is_empty() {
                details.description =
                    format!("{} Built for {}.", details.description, audience.trim());
            }
        }

        details
    }
}

/// The notification address stamped on seeded forms; purge-by-convention
/// matches on this to find forms a previous seed created
pub fn seed_notification_email(site_slug: &str) -> String {
    format!("hello@{}.example.com", site_slug)
}

/// Slugs of the two starter posts for a site
pub fn seed_post_slugs(site_slug: &str) -> [String; 2] {
    [
        format!("introducing-{}", site_slug),
        format!("inside-{}-build", site_slug),
    ]
}

pub fn contact_form(site: &Site, now: DateTime<Utc>) -> FormDoc {
    FormDoc {
        id: Uuid::new_v4(),
        site_id: site.id,
        title: format!("{} contact form", site.name),
        fields: json!([
            {"name": "name", "label": "Name", "type": "text", "required": true},
            {"name": "email", "label": "Email", "type": "email", "required": true},
            {"name": "message", "label": "Message", "type": "textarea", "required": true},
        ]),
        confirmation_message: "Thanks for reaching out. We will get back to you shortly."
            .to_string(),
        notification_email: Some(seed_notification_email(&site.slug)),
        created_at: now,
    }
}

fn page(site: &Site, slug: &str, title: &str, layout: serde_json::Value, now: DateTime<Utc>) -> Page {
    Page {
        id: Uuid::new_v4(),
        site_id: site.id,
        slug: slug.to_string(),
        title: title.to_string(),
        status: PublishStatus::Published,
        layout,
        seo: Seo {
            title: Some(format!("{} | {}", title, site.name)),
            description: None,
        },
        created_at: now,
        updated_at: now,
    }
}

pub fn home_page(
    site: &Site,
    details: &BusinessDetails,
    mode: AddressingMode,
    now: DateTime<Utc>,
) -> Page {
    let contact_path = content_path(ContentKind::Page, CONTACT_SLUG, Some(&site.slug), mode);
    let posts_path = content_path(ContentKind::Page, POSTS_PAGE_SLUG, Some(&site.slug), mode);

    page(
        site,
        "home",
        &details.name,
        json!([
            {
                "blockType": "hero",
                "heading": details.name.clone(),
                "subheading": details.tagline.clone(),
                "links": [
                    {"label": "Get in touch", "url": contact_path},
                    {"label": "Read the blog", "url": posts_path},
                ],
            },
            {
                "blockType": "content",
                "columns": [
                    {"heading": "What we do", "body": details.description.clone()},
                ],
            },
        ]),
        now,
    )
}

pub fn contact_page(
    site: &Site,
    details: &BusinessDetails,
    form: &FormDoc,
    now: DateTime<Utc>,
) -> Page {
    page(
        site,
        CONTACT_SLUG,
        "Contact",
        json!([
            {
                "blockType": "content",
                "columns": [
                    {"heading": "Contact us", "body": format!("Questions for {}? Drop us a line at {} or use the form below.", details.name, details.contact_email)},
                ],
            },
            {
                "blockType": "formBlock",
                "form": form.id,
            },
        ]),
        now,
    )
}

pub fn posts_page(site: &Site, now: DateTime<Utc>) -> Page {
    page(
        site,
        POSTS_PAGE_SLUG,
        "Blog",
        json!([
            {
                "blockType": "archive",
                "collection": "posts",
                "limit": 10,
            },
        ]),
        now,
    )
}

/// The two starter posts, assigned to the seeded categories in order
pub fn seed_posts(
    site: &Site,
    categories: &[Category],
    mode: AddressingMode,
    now: DateTime<Utc>,
) -> Vec<Post> {
    let [intro_slug, build_slug] = seed_post_slugs(&site.slug);
    let home_path = content_path(ContentKind::Page, "home", Some(&site.slug), mode);

    let category_ids = |index: usize| -> Vec<Uuid> {
        categories.get(index).map(|c| vec![c.id]).unwrap_or_default()
    };

    vec![
        Post {
            id: Uuid::new_v4(),
            site_id: site.id,
            slug: intro_slug,
            title: format!("Introducing {}", site.name),
            status: PublishStatus::Published,
            excerpt: Some(format!("Say hello to {}.", site.name)),
            body: json!({
                "blocks": [
                    {"type": "paragraph", "text": format!("{} has a new home on the web.", site.name)},
                    {"type": "paragraph", "text": "We'll share product news and updates here."},
                    {"type": "link", "label": "Back to the homepage", "url": home_path},
                ],
            }),
            categories: category_ids(0),
            related_posts: Vec::new(),
            created_at: now,
            updated_at: now,
        },
        Post {
            id: Uuid::new_v4(),
            site_id: site.id,
            slug: build_slug,
            title: format!("How we built {}", site.name),
            status: PublishStatus::Published,
            excerpt: Some("A look behind the scenes.".to_string()),
            body: json!({
                "blocks": [
                    {"type": "paragraph", "text": format!("A short look at what goes into running {}.", site.name)},
                    {"type": "paragraph", "text": "More soon."},
                ],
            }),
            categories: category_ids(1),
            related_posts: Vec::new(),
            created_at: now,
            updated_at: now,
        },
    ]
}

/// Header or footer navigation pointing at the seeded pages
pub fn default_navigation(
    site: &Site,
    kind: NavKind,
    mode: AddressingMode,
    now: DateTime<Utc>,
) -> Navigation {
    let items = match kind {
        NavKind::Header => vec![
            NavItem {
                label: "Home".to_string(),
                url: content_path(ContentKind::Page, "home", Some(&site.slug), mode),
            },
            NavItem {
                label: "Blog".to_string(),
                url: content_path(ContentKind::Page, POSTS_PAGE_SLUG, Some(&site.slug), mode),
            },
            NavItem {
                label: "Contact".to_string(),
                url: content_path(ContentKind::Page, CONTACT_SLUG, Some(&site.slug), mode),
            },
        ],
        NavKind::Footer => vec![NavItem {
            label: "Contact".to_string(),
            url: content_path(ContentKind::Page, CONTACT_SLUG, Some(&site.slug), mode),
        }],
    };

    Navigation {
        id: Uuid::new_v4(),
        site_id: site.id,
        kind,
        items,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{Branding, SiteStatus};

    fn site() -> Site {
        let now = Utc::now();
        Site {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            slug: "acme".to_string(),
            name: "Acme".to_string(),
            status: SiteStatus::Active,
            branding: Branding::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_seed_post_slugs_are_site_derived() {
        let [a, b] = seed_post_slugs("acme");
        assert_eq!(a, "introducing-acme");
        assert_eq!(b, "inside-acme-build");
    }

    #[test]
    fn test_home_links_respect_addressing_mode() {
        let site = site();
        let details = BusinessDetails::for_site(&site);
        let now = Utc::now();

        let prefixed = home_page(&site, &details, AddressingMode::PathPrefix, now);
        assert!(prefixed.layout.to_string().contains("/sites/acme/contact"));

        let bare = home_page(&site, &details, AddressingMode::Subdomain, now);
        assert!(bare.layout.to_string().contains(r#""url":"/contact""#));
    }

    #[test]
    fn test_seeded_pages_are_published() {
        let site = site();
        let now = Utc::now();
        assert!(posts_page(&site, now).is_published());
        assert!(
            home_page(&site, &BusinessDetails::for_site(&site), AddressingMode::PathPrefix, now)
                .is_published()
        );
    }

    #[test]
    fn test_overrides_layer_onto_site_defaults() {
        let site = site();
        let overrides = BusinessOverrides {
            name: Some("Acme Widgets".to_string()),
            description: Some("Widgets for the working engineer.".to_string()),
            audience: Some("hardware teams".to_string()),
            primary_goal: None,
        };

        let details = BusinessDetails::with_overrides(&site, &overrides);
        assert_eq!(details.name, "Acme Widgets");
        assert_eq!(
            details.description,
            "Widgets for the working engineer. Built for hardware teams."
        );
        // Unsupplied fields keep their site-derived defaults.
        assert_eq!(details.tagline, "Welcome to Acme Widgets");
        assert_eq!(details.contact_email, "hello@acme.example.com");
    }

    #[test]
    fn test_notification_email_identifies_seeded_form() {
        let form = contact_form(&site(), Utc::now());
        assert_eq!(
            form.notification_email.as_deref(),
            Some("hello@acme.example.com")
        );
    }
}
