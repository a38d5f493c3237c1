//! normreg Registry - planned and active work-item lists
//!
//! The services here sit between the access rules of `normreg-access` and
//! a record store:
//! - Assigns `2.<block>.<seq>` codes to planned items without duplicates
//!   under concurrent creation
//! - Scopes planned-list reads and writes by department and block
//! - Moves the planned list into the active list on approval
//! - Administers users and their block ranks
//!
//! # Example
//!
//! ```rust
//! use normreg_model::User;
//! use normreg_registry::{
//!     MemoryActiveStore, MemoryPlannedStore, PlannedItemInput, PlannedListService,
//!     RegistryConfig,
//! };
//! use std::sync::Arc;
//!
//! let service = PlannedListService::new(
//!     Arc::new(MemoryPlannedStore::new()),
//!     Arc::new(MemoryActiveStore::new()),
//!     RegistryConfig::default(),
//! );
//! let user = User::employee("Petrov", "petrov@example.org")
//!     .with_block_rank("1")
//!     .with_department("IT");
//!
//! let item = service
//!     .create(Some(&user), PlannedItemInput::named("Valve standard").with_block("1.01"))
//!     .unwrap();
//! assert_eq!(item.code, "2.1.01.1");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod active;
pub mod code;
pub mod config;
pub mod error;
pub mod page;
pub mod planned;
pub mod store;
pub mod users;

// Re-exports for convenience
pub use active::{ActiveListQuery, ActiveListService};
pub use code::{fallback_code, next_code_for_block, parse_sequence, NextCode, CODE_PREFIX};
pub use config::RegistryConfig;
pub use error::{RegistryError, StoreError};
pub use page::Page;
pub use planned::{ApprovalSummary, PlannedItemInput, PlannedListQuery, PlannedListService};
pub use store::{
    ActiveStore, MemoryActiveStore, MemoryPlannedStore, MemoryUserStore, PlannedStore, UserStore,
};
pub use users::{UserAdmin, UserInput};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the registry
    pub use crate::{
        ActiveListService, PlannedItemInput, PlannedListQuery, PlannedListService,
        RegistryConfig, RegistryError, UserAdmin,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
