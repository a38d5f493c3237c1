//! Flat department access
//!
//! An employee sees records whose department equals their own, compared
//! exactly (case-sensitive, no trimming). Admins see all departments.

use crate::filter::{apply_scope, RecordFilter};
use crate::scope::{resolve_scope, AccessScope, FieldPredicate, ScopeRule};
use normreg_model::{ScopeField, User};

/// Department dimension of the scope resolver
#[derive(Debug, Clone, Copy)]
pub struct DepartmentRule;

impl ScopeRule for DepartmentRule {
    const FIELD: ScopeField = ScopeField::Department;

    fn user_key(user: &User) -> Option<&str> {
        user.department()
    }

    fn predicate(key: &str) -> FieldPredicate {
        FieldPredicate::Exact {
            field: Self::FIELD,
            value: key.to_string(),
        }
    }
}

/// Department access decisions
#[derive(Debug, Clone, Copy, Default)]
pub struct DepartmentAccess;

impl DepartmentAccess {
    /// Create new instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolved department scope of `user`
    #[inline]
    #[must_use]
    pub fn scope(&self, user: Option<&User>) -> AccessScope {
        resolve_scope::<DepartmentRule>(user)
    }

    /// Whether `user` may access records of `department`
    ///
    /// An absent or empty department never matches an employee.
    #[must_use]
    pub fn user_has_access_to_department(
        &self,
        user: Option<&User>,
        department: Option<&str>,
    ) -> bool {
        let allowed = self.scope(user).permits(department);
        if !allowed {
            tracing::trace!(department = department.unwrap_or(""), "department access denied");
        }
        allowed
    }

    /// Narrow `query` to the department visible to `user`
    #[must_use]
    pub fn filter_by_department_access<Q: RecordFilter>(
        &self,
        query: Q,
        user: Option<&User>,
    ) -> Q {
        apply_scope(query, &self.scope(user))
    }
}
