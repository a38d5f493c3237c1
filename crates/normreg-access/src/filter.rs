//! Record-set filtering
//!
//! Access rules narrow collections through [`RecordFilter`], which a query
//! builder or an in-memory set implements. [`RecordSet`] is the in-memory
//! implementation used by the register stores.

use crate::scope::{AccessScope, FieldPredicate};
use normreg_model::Scoped;

/// A collection that can be narrowed by access predicates
///
/// Implementations narrow a view of the data; they never modify the
/// underlying records.
pub trait RecordFilter: Sized {
    /// Narrow to an always-empty result
    #[must_use]
    fn deny_all(self) -> Self;

    /// Narrow to records whose field satisfies `predicate`
    #[must_use]
    fn retain_matching(self, predicate: &FieldPredicate) -> Self;
}

/// Narrow `query` according to `scope`
#[must_use]
pub fn apply_scope<Q: RecordFilter>(query: Q, scope: &AccessScope) -> Q {
    match scope {
        AccessScope::Denied => query.deny_all(),
        AccessScope::Unrestricted => query,
        AccessScope::Restricted(predicate) => query.retain_matching(predicate),
    }
}

/// Lazily filtered view over a slice of records
///
/// Predicates accumulate with AND semantics and are evaluated on iteration.
#[derive(Debug, Clone)]
pub struct RecordSet<'a, T> {
    source: &'a [T],
    predicates: Vec<FieldPredicate>,
    denied: bool,
}

impl<'a, T: Scoped> RecordSet<'a, T> {
    /// View over every record in `source`
    #[inline]
    #[must_use]
    pub fn new(source: &'a [T]) -> Self {
        Self {
            source,
            predicates: Vec::new(),
            denied: false,
        }
    }

    /// Whether `record` passes every accumulated predicate
    #[must_use]
    pub fn admits(&self, record: &T) -> bool {
        !self.denied
            && self
                .predicates
                .iter()
                .all(|p| record.scope_value(p.field()).is_some_and(|v| p.matches(v)))
    }

    /// Iterate over visible records
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        let source = self.source;
        source.iter().filter(move |r| self.admits(r))
    }

    /// Number of visible records
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Whether no record is visible
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a, T: Scoped + Clone> RecordSet<'a, T> {
    /// Clone the visible records out
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Scoped> RecordFilter for RecordSet<'_, T> {
    fn deny_all(mut self) -> Self {
        self.denied = true;
        self
    }

    fn retain_matching(mut self, predicate: &FieldPredicate) -> Self {
        self.predicates.push(predicate.clone());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use normreg_model::{ScopeField, Scoped};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        block: Option<&'static str>,
        department: Option<&'static str>,
    }

    impl Scoped for Row {
        fn scope_value(&self, field: ScopeField) -> Option<&str> {
            match field {
                ScopeField::Block => self.block,
                ScopeField::Department => self.department,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                block: Some("1"),
                department: Some("IT"),
            },
            Row {
                block: Some("1.02"),
                department: Some("QA"),
            },
            Row {
                block: Some("2.01"),
                department: Some("IT"),
            },
            Row {
                block: None,
                department: None,
            },
        ]
    }

    #[test]
    fn unfiltered_set_sees_everything() {
        let data = rows();
        assert_eq!(RecordSet::new(&data).count(), 4);
    }

    #[test]
    fn denied_set_is_empty() {
        let data = rows();
        let set = RecordSet::new(&data).deny_all();
        assert!(set.is_empty());
    }

    #[test]
    fn predicates_combine_with_and() {
        let data = rows();
        let set = RecordSet::new(&data)
            .retain_matching(&FieldPredicate::SelfOrDescendant {
                field: ScopeField::Block,
                value: "1".into(),
            })
            .retain_matching(&FieldPredicate::Exact {
                field: ScopeField::Department,
                value: "IT".into(),
            });
        assert_eq!(set.to_vec(), vec![data[0].clone()]);
    }

    #[test]
    fn filtering_leaves_source_untouched() {
        let data = rows();
        let _ = RecordSet::new(&data).deny_all().count();
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn apply_scope_dispatch() {
        let data = rows();
        assert!(apply_scope(RecordSet::new(&data), &AccessScope::Denied).is_empty());
        assert_eq!(
            apply_scope(RecordSet::new(&data), &AccessScope::Unrestricted).count(),
            4
        );
    }
}
