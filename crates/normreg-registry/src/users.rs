//! User administration
//!
//! Every operation requires [`Permission::UsersManage`].

use crate::error::RegistryError;
use crate::store::UserStore;
use normreg_access::{ensure_permission, Permission};
use normreg_model::{taxonomy, Role, User, UserId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_FIELD_LEN: usize = 255;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap_or_else(|e| unreachable!("email pattern: {e}"))
});

/// Submitted user fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    /// `admin` or `employee`
    pub role: String,
    /// Integer 1-7, ignored for admins
    pub block_rank: Option<String>,
    pub department: Option<String>,
}

impl UserInput {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: role.as_str().to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_block_rank(mut self, rank: impl Into<String>) -> Self {
        self.block_rank = Some(rank.into());
        self
    }

    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Validate and normalize into `(role, block_rank, department)`
    fn normalize(&self) -> Result<(Role, Option<String>, Option<String>), RegistryError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RegistryError::validation("name", "name is required"));
        }
        if name.chars().count() > MAX_FIELD_LEN {
            return Err(RegistryError::validation(
                "name",
                format!("must not exceed {MAX_FIELD_LEN} characters"),
            ));
        }

        let email = self.email.trim();
        if email.chars().count() > MAX_FIELD_LEN || !EMAIL.is_match(email) {
            return Err(RegistryError::validation("email", "must be a valid e-mail address"));
        }

        let role: Role = self.role.trim().parse()?;

        let block_rank = match (role, self.block_rank.as_deref().map(str::trim)) {
            (Role::Admin, _) | (_, None | Some("")) => None,
            (Role::Employee, Some(raw)) => Some(taxonomy::validate_rank(raw)?.to_string()),
        };

        let department = self
            .department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        if department.is_some_and(|d| d.chars().count() > MAX_FIELD_LEN) {
            return Err(RegistryError::validation(
                "department",
                format!("must not exceed {MAX_FIELD_LEN} characters"),
            ));
        }

        Ok((role, block_rank, department.map(str::to_string)))
    }
}

/// User directory management
#[derive(Debug)]
pub struct UserAdmin<S> {
    store: Arc<S>,
}

impl<S: UserStore> UserAdmin<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register a new user
    ///
    /// # Errors
    /// Permission denial, validation failure or a taken e-mail.
    pub fn create(&self, actor: Option<&User>, input: &UserInput) -> Result<User, RegistryError> {
        ensure_permission(actor, Permission::UsersManage)?;
        let (role, block_rank, department) = input.normalize()?;

        let mut user = User::new(input.name.trim(), input.email.trim()).with_role(role);
        user.block_rank = block_rank;
        user.department = department;

        let user = self.store.insert(user).map_err(email_conflict)?;
        tracing::info!(id = %user.id, role = %role, "user created");
        Ok(user)
    }

    /// Replace a user's fields
    ///
    /// # Errors
    /// Permission denial, unknown user, validation failure or a taken
    /// e-mail.
    pub fn update(
        &self,
        actor: Option<&User>,
        id: UserId,
        input: &UserInput,
    ) -> Result<User, RegistryError> {
        ensure_permission(actor, Permission::UsersManage)?;
        let existing = self.store.get(id)?.ok_or(RegistryError::UserNotFound(id))?;
        let (role, block_rank, department) = input.normalize()?;

        let user = User {
            id: existing.id,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            role: Some(role),
            block_rank,
            department,
        };
        self.store.update(user.clone()).map_err(email_conflict)?;
        tracing::info!(id = %id, role = %role, "user updated");
        Ok(user)
    }

    /// Remove a user other than the actor
    ///
    /// # Errors
    /// Permission denial, self-deletion or unknown user.
    pub fn delete(&self, actor: Option<&User>, id: UserId) -> Result<User, RegistryError> {
        ensure_permission(actor, Permission::UsersManage)?;
        if actor.is_some_and(|a| a.id == id) {
            return Err(RegistryError::SelfDeletion);
        }
        if self.store.get(id)?.is_none() {
            return Err(RegistryError::UserNotFound(id));
        }

        let user = self.store.remove(id)?;
        tracing::info!(id = %id, "user deleted");
        Ok(user)
    }

    /// Users whose name or e-mail contains `search`, case-insensitively
    ///
    /// # Errors
    /// Permission denial or store failure.
    pub fn list(
        &self,
        actor: Option<&User>,
        search: Option<&str>,
    ) -> Result<Vec<User>, RegistryError> {
        ensure_permission(actor, Permission::UsersManage)?;
        let needle = search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase);

        Ok(self
            .store
            .all()?
            .into_iter()
            .filter(|u| {
                needle.as_deref().map_or(true, |n| {
                    u.name.to_lowercase().contains(n) || u.email.to_lowercase().contains(n)
                })
            })
            .collect())
    }
}

fn email_conflict(err: crate::error::StoreError) -> RegistryError {
    match err {
        crate::error::StoreError::DuplicateEmail { email } => {
            RegistryError::validation("email", format!("{email} is already registered"))
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryUserStore;
    use normreg_access::AccessError;
    use normreg_test_utils::{admin, employee_in};

    fn setup() -> (UserAdmin<MemoryUserStore>, User) {
        let store = Arc::new(MemoryUserStore::new());
        let root = store.insert(admin()).unwrap();
        (UserAdmin::new(store), root)
    }

    #[test]
    fn employees_cannot_manage_users() {
        let (users, _) = setup();
        let err = users
            .create(Some(&employee_in("IT")), &UserInput::new("x", "x@arm.local", Role::Employee))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Access(AccessError::Forbidden {
                permission: Permission::UsersManage
            })
        ));
    }

    #[test]
    fn rank_is_validated_and_cleared_for_admins() {
        let (users, root) = setup();
        let bad = UserInput::new("e", "e@arm.local", Role::Employee).with_block_rank("8");
        assert!(matches!(
            users.create(Some(&root), &bad),
            Err(RegistryError::Validation { field: "block_rank", .. })
        ));

        let promoted = UserInput::new("a", "a@arm.local", Role::Admin).with_block_rank("3");
        let user = users.create(Some(&root), &promoted).unwrap();
        assert_eq!(user.block_rank, None);
    }

    #[test]
    fn unknown_role_and_bad_email_rejected() {
        let (users, root) = setup();
        let mut input = UserInput::new("e", "e@arm.local", Role::Employee);
        input.role = "root".into();
        assert!(matches!(
            users.create(Some(&root), &input),
            Err(RegistryError::Validation { field: "role", .. })
        ));

        let input = UserInput::new("e", "not-an-email", Role::Employee);
        assert!(matches!(
            users.create(Some(&root), &input),
            Err(RegistryError::Validation { field: "email", .. })
        ));
    }

    #[test]
    fn duplicate_email_is_validation_error() {
        let (users, root) = setup();
        let input = UserInput::new("dup", "admin@arm.local", Role::Employee);
        assert!(matches!(
            users.create(Some(&root), &input),
            Err(RegistryError::Validation { field: "email", .. })
        ));
    }

    #[test]
    fn self_deletion_rejected() {
        let (users, root) = setup();
        assert!(matches!(
            users.delete(Some(&root), root.id),
            Err(RegistryError::SelfDeletion)
        ));
    }

    #[test]
    fn update_keeps_email_unique_but_allows_own() {
        let (users, root) = setup();
        let created = users
            .create(
                Some(&root),
                &UserInput::new("Petrov", "petrov@arm.local", Role::Employee)
                    .with_block_rank("2")
                    .with_department("IT"),
            )
            .unwrap();
        assert_eq!(created.block_rank.as_deref(), Some("2"));

        let renamed = UserInput::new("Petrov P.", "petrov@arm.local", Role::Employee);
        let updated = users.update(Some(&root), created.id, &renamed).unwrap();
        assert_eq!(updated.name, "Petrov P.");
        assert_eq!(updated.department, None);

        let stolen = UserInput::new("Petrov", "admin@arm.local", Role::Employee);
        assert!(users.update(Some(&root), created.id, &stolen).is_err());
    }

    #[test]
    fn search_matches_name_or_email() {
        let (users, root) = setup();
        users
            .create(Some(&root), &UserInput::new("Ivanova", "iv@arm.local", Role::Employee))
            .unwrap();
        assert_eq!(users.list(Some(&root), Some("IVAN")).unwrap().len(), 1);
        assert_eq!(users.list(Some(&root), Some("arm.local")).unwrap().len(), 2);
        assert_eq!(users.list(Some(&root), None).unwrap().len(), 2);
    }
}
