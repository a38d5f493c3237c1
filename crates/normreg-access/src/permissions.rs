//! Named permissions and their assignment to roles

use crate::error::AccessError;
use normreg_model::{Role, User};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation-level permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    PlannedListView,
    PlannedListCreate,
    PlannedListEdit,
    PlannedListDelete,
    PlannedListExport,
    ActiveListView,
    ActiveListCreate,
    ActiveListEdit,
    ActiveListDelete,
    ReportsView,
    ReportsCreate,
    ReportsEdit,
    ReportsDelete,
    ArchiveView,
    ArchiveCreate,
    ArchiveEdit,
    ArchiveDelete,
    FilesView,
    FilesUpload,
    FilesDelete,
    UsersManage,
    StagesManage,
    AllBlocksAccess,
}

impl Permission {
    /// Every permission, in catalogue order
    pub const ALL: [Permission; 23] = [
        Permission::PlannedListView,
        Permission::PlannedListCreate,
        Permission::PlannedListEdit,
        Permission::PlannedListDelete,
        Permission::PlannedListExport,
        Permission::ActiveListView,
        Permission::ActiveListCreate,
        Permission::ActiveListEdit,
        Permission::ActiveListDelete,
        Permission::ReportsView,
        Permission::ReportsCreate,
        Permission::ReportsEdit,
        Permission::ReportsDelete,
        Permission::ArchiveView,
        Permission::ArchiveCreate,
        Permission::ArchiveEdit,
        Permission::ArchiveDelete,
        Permission::FilesView,
        Permission::FilesUpload,
        Permission::FilesDelete,
        Permission::UsersManage,
        Permission::StagesManage,
        Permission::AllBlocksAccess,
    ];

    /// Stored permission name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Permission::PlannedListView => "planned-list.view",
            Permission::PlannedListCreate => "planned-list.create",
            Permission::PlannedListEdit => "planned-list.edit",
            Permission::PlannedListDelete => "planned-list.delete",
            Permission::PlannedListExport => "planned-list.export",
            Permission::ActiveListView => "active-list.view",
            Permission::ActiveListCreate => "active-list.create",
            Permission::ActiveListEdit => "active-list.edit",
            Permission::ActiveListDelete => "active-list.delete",
            Permission::ReportsView => "reports.view",
            Permission::ReportsCreate => "reports.create",
            Permission::ReportsEdit => "reports.edit",
            Permission::ReportsDelete => "reports.delete",
            Permission::ArchiveView => "archive.view",
            Permission::ArchiveCreate => "archive.create",
            Permission::ArchiveEdit => "archive.edit",
            Permission::ArchiveDelete => "archive.delete",
            Permission::FilesView => "files.view",
            Permission::FilesUpload => "files.upload",
            Permission::FilesDelete => "files.delete",
            Permission::UsersManage => "users.manage",
            Permission::StagesManage => "stages.manage",
            Permission::AllBlocksAccess => "all-blocks.access",
        }
    }

    /// Look up a permission by its stored name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }

    /// Administrative permissions employees never hold
    #[inline]
    #[must_use]
    pub const fn is_admin_only(self) -> bool {
        matches!(
            self,
            Permission::UsersManage | Permission::StagesManage | Permission::AllBlocksAccess
        )
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `role` holds `permission`
#[must_use]
pub fn role_grants(role: Role, permission: Permission) -> bool {
    match role {
        Role::Admin => true,
        Role::Employee => !permission.is_admin_only(),
    }
}

/// Permissions held by `role`
#[must_use]
pub fn role_permissions(role: Role) -> Vec<Permission> {
    Permission::ALL
        .iter()
        .copied()
        .filter(|p| role_grants(role, *p))
        .collect()
}

/// Whether `user` holds `permission`
#[must_use]
pub fn can(user: Option<&User>, permission: Permission) -> bool {
    user.and_then(|u| u.role)
        .is_some_and(|role| role_grants(role, permission))
}

/// Require `permission`
///
/// # Errors
/// [`AccessError::Unauthenticated`] without a user,
/// [`AccessError::Forbidden`] when the user's role lacks the permission.
pub fn ensure_permission(user: Option<&User>, permission: Permission) -> Result<(), AccessError> {
    if user.is_none() {
        return Err(AccessError::Unauthenticated);
    }
    if can(user, permission) {
        Ok(())
    } else {
        tracing::debug!(%permission, "permission denied");
        Err(AccessError::Forbidden { permission })
    }
}

/// Require the admin role
///
/// # Errors
/// [`AccessError::Unauthenticated`] or [`AccessError::AdminRequired`].
pub fn ensure_admin(user: Option<&User>) -> Result<(), AccessError> {
    match user {
        None => Err(AccessError::Unauthenticated),
        Some(u) if u.is_admin() => Ok(()),
        Some(_) => Err(AccessError::AdminRequired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_lookup() {
        for p in Permission::ALL {
            assert_eq!(Permission::from_name(p.as_str()), Some(p));
        }
        assert_eq!(Permission::from_name("planned-list.approve"), None);
    }

    #[test]
    fn employee_lacks_admin_permissions() {
        let employee = role_permissions(Role::Employee);
        assert_eq!(employee.len(), 20);
        assert!(!employee.contains(&Permission::UsersManage));
        assert!(employee.contains(&Permission::PlannedListExport));
        assert_eq!(role_permissions(Role::Admin).len(), Permission::ALL.len());
    }

    #[test]
    fn roleless_user_holds_nothing() {
        let user = User::new("n", "n@x");
        assert!(!can(Some(&user), Permission::PlannedListView));
        assert!(matches!(
            ensure_permission(Some(&user), Permission::PlannedListView),
            Err(AccessError::Forbidden { .. })
        ));
    }

    #[test]
    fn missing_user_is_unauthenticated() {
        assert!(matches!(
            ensure_permission(None, Permission::PlannedListView),
            Err(AccessError::Unauthenticated)
        ));
        assert!(matches!(ensure_admin(None), Err(AccessError::Unauthenticated)));
    }

    #[test]
    fn admin_check() {
        let admin = User::admin("a", "a@x");
        let employee = User::employee("e", "e@x");
        assert!(ensure_admin(Some(&admin)).is_ok());
        assert!(matches!(ensure_admin(Some(&employee)), Err(AccessError::AdminRequired)));
    }
}
