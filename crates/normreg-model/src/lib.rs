//! normreg Model
//!
//! Data types shared by the access rules and the register services.
//!
//! # Core Concepts
//!
//! - [`User`]: identity with an optional [`Role`], block rank and department
//! - [`taxonomy`]: the static block code table (7 groups of dotted sub-codes)
//! - [`PlannedItem`] / [`ActiveItem`]: work-item records
//! - [`Scoped`]: records exposing `block` / `department` attributes to access rules
//!
//! # Example
//!
//! ```rust
//! use normreg_model::{taxonomy, User};
//!
//! let user = User::employee("Ivanova", "ivanova@example.org").with_block_rank("3");
//! assert_eq!(user.block_rank(), Some("3"));
//! assert_eq!(taxonomy::sub_codes("3").len(), 5);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod record;
mod role;
mod user;

pub mod taxonomy;

// Re-exports
pub use error::ModelError;
pub use record::{ActiveItem, ItemId, PlannedItem, ScopeField, Scoped};
pub use role::Role;
pub use user::{User, UserId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
