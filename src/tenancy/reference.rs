/**
 * Site Reference Extraction
 *
 * Relationship values arriving from the content layer are polymorphic: a
 * field pointing at a site may hold a bare identifier string, an expanded
 * document object, or a wrapper carrying a nested value that is itself
 * either of the two. This module decodes that shape once, at the edge,
 * into a plain id or slug. Nothing past this module ever sees the raw
 * polymorphic value.
 *
 * Absence is a valid, expected outcome: an unpopulated relationship
 * extracts to `None`, never an error.
 */

use serde::{Deserialize, Serialize};

/// An expanded (or partially expanded) site document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpandedReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// The inner value of a polymorphic wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ReferenceValue {
    /// Bare identifier string
    Id(String),
    /// Expanded document with id and/or slug
    Doc(ExpandedReference),
}

/// A polymorphic site relationship value
///
/// Variant order matters for untagged deserialization: a bare string is
/// tried first, then the `{ "value": ... }` wrapper, then an expanded
/// document (whose fields are all optional and so match last).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SiteReference {
    /// Bare identifier string
    Id(String),
    /// Wrapper carrying a nested value
    Wrapped {
        value: ReferenceValue,
    },
    /// Expanded document
    Doc(ExpandedReference),
}

impl SiteReference {
    /// Extract the referenced site's identifier, if one can be determined
    pub fn extract_id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Doc(doc) => doc.id.as_deref(),
            Self::Wrapped { value } => match value {
                ReferenceValue::Id(id) => Some(id),
                ReferenceValue::Doc(doc) => doc.id.as_deref(),
            },
        }
    }

    /// Extract the referenced site's slug, if one can be determined
    ///
    /// A bare id string carries no slug, so this returns `None` for that
    /// shape even though `extract_id` succeeds.
    pub fn extract_slug(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Doc(doc) => doc.slug.as_deref(),
            Self::Wrapped { value } => match value {
                ReferenceValue::Id(_) => None,
                ReferenceValue::Doc(doc) => doc.slug.as_deref(),
            },
        }
    }
}
