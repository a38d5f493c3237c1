//! Active-list listing

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::page::Page;
use crate::store::ActiveStore;
use normreg_access::{ensure_permission, Permission};
use normreg_model::{ActiveItem, User};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Filters of the active-list view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveListQuery {
    /// Substring of the development name
    pub name: Option<String>,
    /// Exact development type
    pub development_type: Option<String>,
    /// Exact current stage
    pub stage: Option<String>,
    /// Substring of the organizations field
    pub organization: Option<String>,
    pub page: usize,
}

impl ActiveListQuery {
    fn admits(&self, item: &ActiveItem) -> bool {
        let wanted =
            |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_lowercase);

        wanted(&self.name).map_or(true, |n| item.development_name.to_lowercase().contains(&n))
            && wanted(&self.organization)
                .map_or(true, |o| item.organizations.to_lowercase().contains(&o))
            && self
                .development_type
                .as_deref()
                .filter(|s| !s.is_empty())
                .map_or(true, |t| item.development_type == t)
            && self
                .stage
                .as_deref()
                .filter(|s| !s.is_empty())
                .map_or(true, |s| item.current_stage == s)
    }
}

/// Read side of the active list
#[derive(Debug)]
pub struct ActiveListService<A> {
    store: Arc<A>,
    page_size: usize,
}

impl<A: ActiveStore> ActiveListService<A> {
    #[must_use]
    pub fn new(store: Arc<A>, config: &RegistryConfig) -> Self {
        Self {
            store,
            page_size: config.page_size,
        }
    }

    /// Filtered, code-ordered page of active items
    ///
    /// # Errors
    /// Permission denial or store failure.
    pub fn list(
        &self,
        user: Option<&User>,
        query: &ActiveListQuery,
    ) -> Result<Page<ActiveItem>, RegistryError> {
        ensure_permission(user, Permission::ActiveListView)?;

        let mut rows: Vec<ActiveItem> = self
            .store
            .all()?
            .into_iter()
            .filter(|i| query.admits(i))
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        Ok(Page::paginate(rows, query.page, self.page_size))
    }

    /// Distinct non-empty development types, sorted
    ///
    /// # Errors
    /// Permission denial or store failure.
    pub fn development_types(&self, user: Option<&User>) -> Result<Vec<String>, RegistryError> {
        self.distinct(user, |i| &i.development_type)
    }

    /// Distinct non-empty stages, sorted
    ///
    /// # Errors
    /// Permission denial or store failure.
    pub fn stages(&self, user: Option<&User>) -> Result<Vec<String>, RegistryError> {
        self.distinct(user, |i| &i.current_stage)
    }

    fn distinct(
        &self,
        user: Option<&User>,
        field: impl Fn(&ActiveItem) -> &String,
    ) -> Result<Vec<String>, RegistryError> {
        ensure_permission(user, Permission::ActiveListView)?;

        let values: BTreeSet<String> = self
            .store
            .all()?
            .iter()
            .map(|i| field(i))
            .filter(|v| !v.is_empty())
            .cloned()
            .collect();
        Ok(values.into_iter().collect())
    }
}
