/**
 * Tenancy Module
 *
 * This module owns everything about site identity:
 *
 * - `reference` - normalizing polymorphic site relationship values
 * - `slug` - slug normalization, DNS-label validation, reserved words
 * - `paths` - the canonical content path generator and its inverse
 * - `resolver` - the host/path resolver middleware that maps inbound
 *   hostnames to sites and rewrites requests to the canonical path
 */

pub mod paths;
pub mod reference;
pub mod resolver;
pub mod slug;

pub use paths::{content_path, AddressingMode, ContentKind, SITE_PATH_PREFIX};
pub use reference::SiteReference;
