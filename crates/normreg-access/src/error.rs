//! Access errors raised at the request boundary
//!
//! The rule engines themselves only answer yes/no; these errors are produced
//! by the guards that turn a "no" into a rejected request.

use crate::permissions::Permission;

/// Rejected request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// No authenticated user
    #[error("authentication required")]
    Unauthenticated,

    /// Role lacks a named permission
    #[error("missing permission: {permission}")]
    Forbidden {
        /// The permission that was required
        permission: Permission,
    },

    /// Operation reserved for administrators
    #[error("administrator role required")]
    AdminRequired,

    /// Block outside the user's rank
    #[error("no access to block {block}; allowed block rank: {}", .rank.as_deref().unwrap_or("none"))]
    BlockDenied {
        /// Requested block
        block: String,
        /// The user's own rank, if any
        rank: Option<String>,
    },

    /// Record belongs to another department
    #[error("no access to department '{department}'")]
    DepartmentDenied {
        /// Department of the record
        department: String,
    },
}
