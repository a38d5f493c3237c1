//! Mutation guards
//!
//! Turn negative access decisions into [`AccessError`]s before a write.

use crate::block::BlockAccess;
use crate::department::DepartmentAccess;
use crate::error::AccessError;
use normreg_model::User;
use serde::{Deserialize, Serialize};

/// Kind of incoming request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// GET / HEAD
    Read,
    /// POST
    Create,
    /// PUT
    Replace,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl RequestKind {
    /// Whether the request carries a record body that may name a block
    #[inline]
    #[must_use]
    pub const fn submits_record(self) -> bool {
        matches!(self, Self::Create | Self::Replace | Self::Patch)
    }
}

/// Reject a submitted `block` the user may not write to
///
/// Admins and non-submitting requests always pass, as does an absent or
/// empty block (emptiness is validated elsewhere).
///
/// # Errors
/// [`AccessError::BlockDenied`] naming the block and the user's rank.
pub fn guard_block_mutation(
    user: Option<&User>,
    kind: RequestKind,
    block: Option<&str>,
) -> Result<(), AccessError> {
    if user.is_some_and(User::is_admin) || !kind.submits_record() {
        return Ok(());
    }

    match block.filter(|b| !b.is_empty()) {
        Some(block) if !BlockAccess::new().user_has_access_to_block(user, block) => {
            let rank = user.and_then(User::block_rank).map(str::to_string);
            tracing::debug!(block, rank = rank.as_deref(), "block mutation rejected");
            Err(AccessError::BlockDenied {
                block: block.to_string(),
                rank,
            })
        }
        _ => Ok(()),
    }
}

/// Require access to a record's department before changing it
///
/// # Errors
/// [`AccessError::DepartmentDenied`] when the department check fails.
pub fn ensure_department_access(
    user: Option<&User>,
    department: Option<&str>,
) -> Result<(), AccessError> {
    if DepartmentAccess::new().user_has_access_to_department(user, department) {
        Ok(())
    } else {
        tracing::debug!(department = department.unwrap_or(""), "department mutation rejected");
        Err(AccessError::DepartmentDenied {
            department: department.unwrap_or_default().to_string(),
        })
    }
}
