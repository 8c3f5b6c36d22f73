/**
 * Application Error Types
 *
 * This module defines the error types used across the backend. Each
 * variant maps to an HTTP status code and carries a human-readable
 * message.
 *
 * # Error Categories
 *
 * - Not-found: a tenant, site, page, or post is absent. Terminates the
 *   route with a 404; a normal outcome, not a failure.
 * - Validation: malformed slug, reserved word, or otherwise invalid
 *   input. Rejected synchronously with a specific, actionable message.
 * - Conflict: a duplicate slug or subdomain.
 * - Transient write: document-store contention that a caller may retry
 *   with backoff.
 * - Store: an underlying database failure.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Application error type
///
/// This enum represents all errors that can surface from handlers, the
/// data-access layer, and the provisioning pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    /// A requested entity does not exist
    #[error("{what} not found")]
    NotFound {
        /// What was looked up (e.g. "site", "post")
        what: String,
    },

    /// Invalid input, rejected before any write
    #[error("Validation error: {message}")]
    Validation {
        /// Specific, actionable description of the problem
        message: String,
    },

    /// A uniqueness constraint was violated
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// Missing or invalid credentials for a protected operation
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Transient write conflict in the document store; safe to retry
    #[error("Transient write conflict: {message}")]
    TransientWrite {
        /// Human-readable error message
        message: String,
    },

    /// Database error
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error with no more specific category
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message
        message: String,
    },
}

impl AppError {
    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a transient write error
    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientWrite {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error represents a transient write conflict that the
    /// retry policy should re-attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientWrite { .. })
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::TransientWrite { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let error = AppError::not_found("site");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.message(), "site not found");
    }

    #[test]
    fn test_validation_status() {
        let error = AppError::validation("slug must be lowercase");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.message().contains("slug must be lowercase"));
    }

    #[test]
    fn test_conflict_status() {
        let error = AppError::conflict("slug already taken");
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_transient_is_retryable() {
        assert!(AppError::transient("write conflict").is_transient());
        assert!(!AppError::validation("bad slug").is_transient());
        assert!(!AppError::internal("boom").is_transient());
    }

    #[test]
    fn test_transient_status() {
        let error = AppError::transient("write conflict");
        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
