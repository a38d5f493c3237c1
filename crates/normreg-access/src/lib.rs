//! normreg Access Control
//!
//! Decides which records a user may see or change.
//!
//! # Overview
//!
//! Two rule engines share one scope resolver:
//! - **Block access** ([`BlockAccess`]): hierarchical, an employee's block
//!   rank `r` grants `r` and every code below `r.`
//! - **Department access** ([`DepartmentAccess`]): flat, exact match on the
//!   employee's department
//!
//! In both, admins see everything and users without a key see nothing.
//! Record collections are narrowed through [`RecordFilter`]; guards in
//! [`guard`] and [`permissions`] convert denials into [`AccessError`]s.
//!
//! # Example
//!
//! ```rust
//! use normreg_access::BlockAccess;
//! use normreg_model::User;
//!
//! let access = BlockAccess::new();
//! let user = User::employee("Petrov", "petrov@example.org").with_block_rank("1");
//!
//! assert!(access.user_has_access_to_block(Some(&user), "1.03"));
//! assert!(!access.user_has_access_to_block(Some(&user), "2.01"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod block;
pub mod department;
pub mod error;
pub mod filter;
pub mod guard;
pub mod permissions;
pub mod profile;
pub mod scope;

// Re-exports
pub use block::{BlockAccess, BlockRule};
pub use department::{DepartmentAccess, DepartmentRule};
pub use error::AccessError;
pub use filter::{apply_scope, RecordFilter, RecordSet};
pub use guard::{ensure_department_access, guard_block_mutation, RequestKind};
pub use permissions::{can, ensure_admin, ensure_permission, Permission};
pub use profile::SessionProfile;
pub use scope::{resolve_scope, AccessScope, FieldPredicate, ScopeRule};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for access checks
    pub use crate::{
        AccessError, AccessScope, BlockAccess, DepartmentAccess, Permission, RecordFilter,
        RecordSet, RequestKind,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
