//! Per-request user profile shared with the UI

use crate::block::BlockAccess;
use normreg_model::{Role, User, UserId};
use serde::Serialize;

/// Profile of the signed-in user, including the block picker contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub block_rank: Option<String>,
    pub department: Option<String>,
    pub accessible_blocks: Vec<String>,
}

impl SessionProfile {
    /// Build the profile; accessible blocks are computed fresh each call
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            block_rank: user.block_rank().map(str::to_string),
            department: user.department().map(str::to_string),
            accessible_blocks: BlockAccess::new().accessible_blocks(Some(user)),
        }
    }
}
