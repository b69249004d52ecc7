//! Error types for the Backoffice domain.
//!
//! All fallible domain operations return [`Result<T>`], an alias over
//! [`BackofficeError`]. HTTP mapping happens in the server crate.
//!
//! # Example
//!
//! ```
//! use backoffice_core::{BackofficeError, Result};
//!
//! fn find(id: u64) -> Result<String> {
//!     Err(BackofficeError::partner_not_found(id))
//! }
//!
//! assert!(find(7).unwrap_err().is_not_found());
//! ```

use thiserror::Error;

/// Main error type for Backoffice domain operations.
#[derive(Debug, Error)]
pub enum BackofficeError {
    /// No partner configuration exists with the given id.
    #[error("Partner configuration {id} not found")]
    PartnerNotFound {
        /// Requested identifier
        id: u64,
    },

    /// A field failed validation.
    #[error("Invalid value for '{field}': {reason}")]
    Validation {
        /// Offending field name
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// The backing repository could not complete the operation.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl BackofficeError {
    /// Creates a `PartnerNotFound` error.
    pub fn partner_not_found(id: u64) -> Self {
        Self::PartnerNotFound { id }
    }

    /// Creates a `Validation` error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Repository` error.
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns true if the error means the entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PartnerNotFound { .. })
    }

    /// Returns true if the error was caused by invalid input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result alias for Backoffice domain operations.
pub type Result<T> = std::result::Result<T, BackofficeError>;
