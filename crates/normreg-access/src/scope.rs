//! Scope resolution shared by every access dimension
//!
//! Each dimension (block, department) follows the same ladder: no user
//! sees nothing, an admin sees everything, an employee with a key sees the
//! records matching that key, anyone else sees nothing. Only the key and
//! the comparison differ, and those come from a [`ScopeRule`].

use normreg_model::{ScopeField, User};
use serde::{Deserialize, Serialize};

/// Comparison applied to a record field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldPredicate {
    /// `field == value`, case-sensitive
    Exact { field: ScopeField, value: String },

    /// `field == value` or `field` starts with `value + "."`
    SelfOrDescendant { field: ScopeField, value: String },
}

impl FieldPredicate {
    /// Field the predicate reads
    #[inline]
    #[must_use]
    pub fn field(&self) -> ScopeField {
        match self {
            Self::Exact { field, .. } | Self::SelfOrDescendant { field, .. } => *field,
        }
    }

    /// Key the field is compared with
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Exact { value, .. } | Self::SelfOrDescendant { value, .. } => value,
        }
    }

    /// Check a candidate field value
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact { value, .. } => candidate == value,
            Self::SelfOrDescendant { value, .. } => is_self_or_descendant(candidate, value),
        }
    }
}

/// `code == root` or `code` starts with `root + "."`
///
/// Plain string prefix test; the taxonomy is not consulted.
#[inline]
#[must_use]
pub fn is_self_or_descendant(code: &str, root: &str) -> bool {
    code == root
        || code
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Resolved visibility of one user along one dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// Nothing is visible
    Denied,
    /// Everything is visible
    Unrestricted,
    /// Only records whose field satisfies the predicate
    Restricted(FieldPredicate),
}

impl AccessScope {
    /// Whether a record with this field value is visible
    ///
    /// A missing value is only visible under [`AccessScope::Unrestricted`].
    #[must_use]
    pub fn permits(&self, value: Option<&str>) -> bool {
        match self {
            Self::Denied => false,
            Self::Unrestricted => true,
            Self::Restricted(predicate) => value.is_some_and(|v| predicate.matches(v)),
        }
    }

    /// Whether the scope hides every record
    #[inline]
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }
}

/// One access dimension: which user attribute is the key and how records
/// are compared against it
pub trait ScopeRule {
    /// Record field the rule reads
    const FIELD: ScopeField;

    /// The employee's key for this dimension, `None` when unset
    fn user_key(user: &User) -> Option<&str>;

    /// Predicate a record field must satisfy for `key`
    fn predicate(key: &str) -> FieldPredicate;
}

/// Resolve the scope of `user` under rule `R`
#[must_use]
pub fn resolve_scope<R: ScopeRule>(user: Option<&User>) -> AccessScope {
    let Some(user) = user else {
        return AccessScope::Denied;
    };

    if user.is_admin() {
        return AccessScope::Unrestricted;
    }

    if user.is_employee() {
        if let Some(key) = R::user_key(user) {
            return AccessScope::Restricted(R::predicate(key));
        }
    }

    AccessScope::Denied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendant_requires_dot_boundary() {
        assert!(is_self_or_descendant("3", "3"));
        assert!(is_self_or_descendant("3.01", "3"));
        assert!(is_self_or_descendant("3.01.7", "3"));
        assert!(!is_self_or_descendant("30", "3"));
        assert!(!is_self_or_descendant("30.01", "3"));
        assert!(!is_self_or_descendant("", "3"));
        assert!(!is_self_or_descendant("3", "3.01"));
    }

    #[test]
    fn denied_scope_permits_nothing() {
        assert!(!AccessScope::Denied.permits(Some("1")));
        assert!(!AccessScope::Denied.permits(None));
    }

    #[test]
    fn unrestricted_scope_permits_missing_values() {
        assert!(AccessScope::Unrestricted.permits(None));
    }

    #[test]
    fn restricted_scope_hides_missing_values() {
        let scope = AccessScope::Restricted(FieldPredicate::Exact {
            field: ScopeField::Department,
            value: "IT".into(),
        });
        assert!(scope.permits(Some("IT")));
        assert!(!scope.permits(Some("it")));
        assert!(!scope.permits(None));
    }
}
