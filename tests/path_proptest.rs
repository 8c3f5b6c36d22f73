//! Property-based tests for the content path generator
//!
//! Uses proptest to check that generated paths parse back to the same
//! (kind, slug, site) triple, and that generation is total and
//! absolute over arbitrary slug shapes.

use proptest::prelude::*;

use sitewright::tenancy::paths::{
    content_path, parse_content_path, AddressingMode, ContentKind,
};

fn slug_segment() -> impl Strategy<Value = String> {
    // DNS-ish segments; "posts" and "home" are excluded because both
    // carry routing meaning of their own.
    "[a-z][a-z0-9-]{0,10}[a-z0-9]"
        .prop_filter("reserved segment", |s| s != "posts" && s != "home")
}

fn page_slug() -> impl Strategy<Value = String> {
    prop::collection::vec(slug_segment(), 1..4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #[test]
    fn test_page_path_round_trips(site in slug_segment(), slug in page_slug()) {
        let path = content_path(
            ContentKind::Page,
            &slug,
            Some(&site),
            AddressingMode::PathPrefix,
        );
        let parsed = parse_content_path(&path, AddressingMode::PathPrefix).unwrap();

        prop_assert_eq!(parsed.kind, ContentKind::Page);
        prop_assert_eq!(parsed.slug, slug);
        prop_assert_eq!(parsed.site_slug, Some(site));
    }

    #[test]
    fn test_post_path_round_trips(site in slug_segment(), slug in slug_segment()) {
        let path = content_path(
            ContentKind::Post,
            &slug,
            Some(&site),
            AddressingMode::PathPrefix,
        );
        let parsed = parse_content_path(&path, AddressingMode::PathPrefix).unwrap();

        prop_assert_eq!(parsed.kind, ContentKind::Post);
        prop_assert_eq!(parsed.slug, slug);
        prop_assert_eq!(parsed.site_slug, Some(site));
    }

    #[test]
    fn test_paths_are_absolute_and_clean(slug in ".*", site in slug_segment()) {
        for kind in [ContentKind::Page, ContentKind::Post] {
            for mode in [AddressingMode::Subdomain, AddressingMode::PathPrefix] {
                let path = content_path(kind, &slug, Some(&site), mode);
                prop_assert!(path.starts_with('/'));
                prop_assert!(!path.contains("//"));
                prop_assert!(path == "/" || !path.ends_with('/'));
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic(slug in ".*", site in slug_segment()) {
        let a = content_path(ContentKind::Page, &slug, Some(&site), AddressingMode::PathPrefix);
        let b = content_path(ContentKind::Page, &slug, Some(&site), AddressingMode::PathPrefix);
        prop_assert_eq!(a, b);
    }
}
