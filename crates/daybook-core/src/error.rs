//! Error types for the diary duplication workflow.
//!
//! Four failure classes cover the whole pipeline: missing configuration,
//! downstream API failures, an empty diary collection, and source entries
//! whose schema no longer matches expectations. No error is retried or
//! recovered from; each one is logged where it occurs and propagated
//! unchanged to the HTTP boundary, which renders it as a 500 response.

use thiserror::Error;

/// Result type alias using `DiaryError`.
pub type Result<T> = std::result::Result<T, DiaryError>;

/// Error taxonomy for the diary duplication pipeline.
///
/// Variants display their message verbatim so the HTTP boundary can
/// serialize them into the response body as-is.
#[derive(Debug, Clone, Error)]
pub enum DiaryError {
    /// A required setting is missing or empty.
    #[error("{message}")]
    Configuration {
        /// Description of the missing setting
        message: String,
    },

    /// A downstream API call failed or returned an unexpected shape.
    #[error("{message}")]
    Remote {
        /// Description of the failed operation
        message: String,
    },

    /// The diary collection holds no entries to duplicate.
    #[error("{message}")]
    NotFound {
        /// Description of what was queried
        message: String,
    },

    /// The source entry's schema does not match the expected shape.
    #[error("{message}")]
    MalformedEntry {
        /// Description of the schema mismatch
        message: String,
    },
}

impl DiaryError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Creates a remote error.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote { message: message.into() }
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into() }
    }

    /// Creates a malformed-entry error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedEntry { message: message.into() }
    }
}
