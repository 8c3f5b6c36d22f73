/**
 * Routes Module
 *
 * HTTP surface: public site content and sitemaps under `/sites`, and
 * the management API (registration, seeding, revalidation) under
 * `/api`.
 */

pub mod content;
pub mod register;
pub mod revalidate;
pub mod router;
pub mod seed;
pub mod sitemap;
