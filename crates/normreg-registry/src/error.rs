//! Error types for the register services
//!
//! Provides error handling for:
//! - Input validation failures
//! - Access and permission denials
//! - Missing records
//! - Code assignment collisions

use normreg_access::AccessError;
use normreg_model::{ItemId, ModelError, UserId};

/// Main register error type
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Request rejected by an access rule
    #[error("access denied: {0}")]
    Access(#[from] AccessError),

    /// Input failed validation
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Offending input field
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// Planned item not found
    #[error("planned item not found: {0}")]
    NotFound(ItemId),

    /// User not found
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Approval requested on an empty planned list
    #[error("no planned items to approve")]
    NothingToApprove,

    /// A user tried to delete their own account
    #[error("users cannot delete their own account")]
    SelfDeletion,

    /// Every code attempt collided with an existing code
    #[error("no unique code for block '{block}' after {attempts} attempts")]
    CodeExhausted {
        /// Block being numbered, empty for fallback codes
        block: String,
        /// Attempts made
        attempts: u32,
    },

    /// Storage failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl RegistryError {
    /// Validation error shorthand
    #[inline]
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the request was refused for lack of rights
    #[inline]
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::Access(_))
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CodeExhausted { .. })
            || matches!(self, Self::Store(e) if e.is_retryable())
    }
}

impl From<ModelError> for RegistryError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownRole(_) => Self::validation("role", err.to_string()),
            ModelError::InvalidBlockRank { .. } => Self::validation("block_rank", err.to_string()),
        }
    }
}

/// Storage errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint on `code` violated
    #[error("code already assigned: {code}")]
    DuplicateCode {
        /// Conflicting code
        code: String,
    },

    /// Unique constraint on `email` violated
    #[error("e-mail already registered: {email}")]
    DuplicateEmail {
        /// Conflicting e-mail
        email: String,
    },

    /// Record does not exist
    #[error("record not found: {0}")]
    Missing(String),

    /// Backend failure
    #[error("backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Check if the write can be retried with a fresh code
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DuplicateCode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = RegistryError::validation("block", "block is required");
        assert_eq!(err.to_string(), "invalid block: block is required");
    }

    #[test]
    fn duplicate_code_is_retryable() {
        let err = RegistryError::from(StoreError::DuplicateCode {
            code: "2.1.1".into(),
        });
        assert!(err.is_retryable());
        assert!(!RegistryError::NothingToApprove.is_retryable());
    }

    #[test]
    fn access_errors_convert() {
        let err = RegistryError::from(AccessError::AdminRequired);
        assert!(err.is_access_denied());
    }

    #[test]
    fn model_errors_become_validation() {
        let err = RegistryError::from(ModelError::UnknownRole("root".into()));
        assert!(matches!(err, RegistryError::Validation { field: "role", .. }));
    }
}
