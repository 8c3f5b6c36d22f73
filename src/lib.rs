//! Sitewright - Main Library
//!
//! Sitewright is a multi-tenant website builder backend built with Rust.
//! It pairs a content store (tenants, sites, pages, posts, forms,
//! redirects, navigation) with a server-rendered storefront that resolves
//! an incoming hostname or path prefix to a site and serves that site's
//! content.
//!
//! # Module Structure
//!
//! - **`server`** - Configuration, shared state, and app construction
//! - **`error`** - Error taxonomy and HTTP response conversion
//! - **`tenancy`** - Site identity: reference extraction, slug rules,
//!   content path generation, and the host/path resolver middleware
//! - **`store`** - Document-store seam with Postgres and in-memory
//!   implementations
//! - **`cache`** - Tag/path cache and invalidation dispatch
//! - **`content`** - Site data access (cached and draft paths), redirects,
//!   sitemap reads
//! - **`revalidate`** - Mutation hooks computing cache invalidation fan-out
//! - **`seed`** - Starter-content provisioning pipeline with retry policy
//! - **`routes`** - Axum router and HTTP handlers
//!
//! # Request Flow
//!
//! Every inbound request passes through the host/path resolver first; it
//! decides the site and rewrites the request to the canonical internal
//! path (`/sites/<slug>/...`). Route handlers then load the site and its
//! page or post through the data-access layer, building links with the
//! content path generator. Content mutations feed the revalidation
//! fan-out, which computes the tags and literal paths to invalidate.

pub mod auth;
pub mod cache;
pub mod content;
pub mod error;
pub mod revalidate;
pub mod routes;
pub mod seed;
pub mod server;
pub mod store;
pub mod tenancy;
