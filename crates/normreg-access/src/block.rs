//! Hierarchical block access
//!
//! An employee with block rank `r` may use `r` itself and every code that
//! extends it with a dot (`r.01`, `r.01.x`, ...). Admins may use any code.

use crate::filter::{apply_scope, RecordFilter};
use crate::scope::{resolve_scope, AccessScope, FieldPredicate, ScopeRule};
use normreg_model::{taxonomy, ScopeField, User};

/// Block dimension of the scope resolver
#[derive(Debug, Clone, Copy)]
pub struct BlockRule;

impl ScopeRule for BlockRule {
    const FIELD: ScopeField = ScopeField::Block;

    fn user_key(user: &User) -> Option<&str> {
        user.block_rank()
    }

    fn predicate(key: &str) -> FieldPredicate {
        FieldPredicate::SelfOrDescendant {
            field: Self::FIELD,
            value: key.to_string(),
        }
    }
}

/// Block access decisions
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockAccess;

impl BlockAccess {
    /// Create new instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolved block scope of `user`
    #[inline]
    #[must_use]
    pub fn scope(&self, user: Option<&User>) -> AccessScope {
        resolve_scope::<BlockRule>(user)
    }

    /// Whether `user` may access `block`
    ///
    /// Admins pass for every string, including codes outside the taxonomy.
    #[must_use]
    pub fn user_has_access_to_block(&self, user: Option<&User>, block: &str) -> bool {
        let allowed = self.scope(user).permits(Some(block));
        if !allowed {
            tracing::trace!(block, "block access denied");
        }
        allowed
    }

    /// Narrow `query` to the blocks visible to `user`
    #[must_use]
    pub fn filter_by_block_access<Q: RecordFilter>(&self, query: Q, user: Option<&User>) -> Q {
        apply_scope(query, &self.scope(user))
    }

    /// Block codes visible to `user`, for populating pickers
    ///
    /// - admin: the full taxonomy
    /// - employee with rank `r`: `r` followed by the sub-codes of `r`
    /// - anyone else: nothing
    #[must_use]
    pub fn accessible_blocks(&self, user: Option<&User>) -> Vec<String> {
        match self.scope(user) {
            AccessScope::Denied => Vec::new(),
            AccessScope::Unrestricted => taxonomy::all_codes()
                .into_iter()
                .map(str::to_string)
                .collect(),
            AccessScope::Restricted(predicate) => {
                let rank = predicate.value();
                std::iter::once(rank)
                    .chain(taxonomy::sub_codes(rank).iter().copied())
                    .map(str::to_string)
                    .collect()
            }
        }
    }
}
