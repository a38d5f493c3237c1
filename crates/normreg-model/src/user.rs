//! Users and their access attributes

use crate::role::Role;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique user identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub Ulid);

impl UserId {
    /// Generate new user ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A register user
///
/// `block_rank` and `department` are stored as entered; empty strings count
/// as unset. Access rules only read them for employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login e-mail
    pub email: String,
    /// Assigned role, if any
    pub role: Option<Role>,
    /// Top-level block code the employee works in
    pub block_rank: Option<String>,
    /// Organizational unit label
    pub department: Option<String>,
}

impl User {
    /// Create a user without a role
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            role: None,
            block_rank: None,
            department: None,
        }
    }

    /// Create an administrator
    #[inline]
    #[must_use]
    pub fn admin(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(name, email).with_role(Role::Admin)
    }

    /// Create an employee with no rank or department yet
    #[inline]
    #[must_use]
    pub fn employee(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(name, email).with_role(Role::Employee)
    }

    /// Assign a role
    ///
    /// Assigning [`Role::Admin`] clears the block rank.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        if role == Role::Admin {
            self.block_rank = None;
        }
        self.role = Some(role);
        self
    }

    /// With block rank
    #[inline]
    #[must_use]
    pub fn with_block_rank(mut self, rank: impl Into<String>) -> Self {
        self.block_rank = Some(rank.into());
        self
    }

    /// With department
    #[inline]
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Check role membership
    #[inline]
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    /// Whether the user is an administrator
    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Whether the user is an employee
    #[inline]
    #[must_use]
    pub fn is_employee(&self) -> bool {
        self.has_role(Role::Employee)
    }

    /// Block rank, if set and non-empty
    #[inline]
    #[must_use]
    pub fn block_rank(&self) -> Option<&str> {
        non_empty(self.block_rank.as_deref())
    }

    /// Department, if set and non-empty
    #[inline]
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        non_empty(self.department.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_clears_rank() {
        let user = User::employee("a", "a@x")
            .with_block_rank("3")
            .with_role(Role::Admin);
        assert!(user.is_admin());
        assert_eq!(user.block_rank(), None);
    }

    #[test]
    fn empty_attributes_read_as_unset() {
        let user = User::employee("e", "e@x")
            .with_block_rank("")
            .with_department("");
        assert_eq!(user.block_rank(), None);
        assert_eq!(user.department(), None);
    }

    #[test]
    fn user_without_role() {
        let user = User::new("n", "n@x").with_block_rank("1");
        assert!(!user.is_admin());
        assert!(!user.is_employee());
        assert_eq!(user.block_rank(), Some("1"));
    }
}
