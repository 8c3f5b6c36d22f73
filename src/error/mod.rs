/**
 * Error Module
 *
 * This module defines the application error taxonomy and its conversion
 * to HTTP responses.
 */

pub mod conversion;
pub mod types;

pub use types::AppError;
