//! Planned-list service
//!
//! Create, update, delete, list and approve planned work items. Every
//! operation checks the caller's permission first; writes to an existing
//! item additionally require department access.
//!
//! Code assignment reads the block's existing codes and inserts the new
//! record while holding a per-block lock. The store's unique constraint on
//! `code` backs this up for writers outside this process: a collision is
//! retried with a fresh snapshot, bounded by
//! [`RegistryConfig::max_code_retries`].

use crate::code::{fallback_code, next_code_for_block, NextCode};
use crate::config::RegistryConfig;
use crate::error::{RegistryError, StoreError};
use crate::page::Page;
use crate::store::{ActiveStore, PlannedStore};
use chrono::{Local, Months, NaiveDate};
use dashmap::DashMap;
use normreg_access::{
    ensure_admin, ensure_department_access, ensure_permission, guard_block_mutation,
    DepartmentAccess, Permission, RecordSet, RequestKind,
};
use normreg_model::{ActiveItem, ItemId, PlannedItem, User};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_NAME_LEN: usize = 255;
const MAX_ORGANIZATIONS_LEN: usize = 500;
const MAX_NOTES_LEN: usize = 1000;

/// Submitted fields of a planned item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannedItemInput {
    pub development_name: String,
    pub development_type: Option<String>,
    pub document_type: Option<String>,
    pub designation: Option<String>,
    pub organizations: Option<String>,
    pub block: Option<String>,
    pub department: Option<String>,
    pub author: Option<String>,
    pub page_count: Option<u32>,
    pub development_start: Option<NaiveDate>,
    pub development_end: Option<NaiveDate>,
    /// Total cost; admins only
    pub cost: Option<f64>,
    /// Cost for 2025; admins only
    pub cost_2025: Option<f64>,
    pub regulatory_documents: Option<String>,
    pub first_year_stages: Option<String>,
    pub subsequent_years_stages: Option<String>,
}

impl PlannedItemInput {
    /// Input with just the required name
    #[must_use]
    pub fn named(development_name: impl Into<String>) -> Self {
        Self {
            development_name: development_name.into(),
            ..Self::default()
        }
    }

    /// With block
    #[must_use]
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into());
        self
    }

    /// With department
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// With total cost
    #[must_use]
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Submitted block, trimmed, if not blank
    #[must_use]
    pub fn block(&self) -> Option<&str> {
        self.block.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }

    /// Store the trimmed block; a blank block becomes no block
    fn normalize_block(&mut self) {
        self.block = self.block().map(str::to_string);
    }

    /// Check required fields and length limits
    ///
    /// # Errors
    /// [`RegistryError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.development_name.trim().is_empty() {
            return Err(RegistryError::validation(
                "development_name",
                "development name is required",
            ));
        }

        let limited = [
            ("development_name", Some(self.development_name.as_str()), MAX_NAME_LEN),
            ("development_type", self.development_type.as_deref(), MAX_NAME_LEN),
            ("document_type", self.document_type.as_deref(), MAX_NAME_LEN),
            ("designation", self.designation.as_deref(), MAX_NAME_LEN),
            ("block", self.block.as_deref(), MAX_NAME_LEN),
            ("department", self.department.as_deref(), MAX_NAME_LEN),
            ("author", self.author.as_deref(), MAX_NAME_LEN),
            ("organizations", self.organizations.as_deref(), MAX_ORGANIZATIONS_LEN),
            ("regulatory_documents", self.regulatory_documents.as_deref(), MAX_NOTES_LEN),
            ("first_year_stages", self.first_year_stages.as_deref(), MAX_NOTES_LEN),
            ("subsequent_years_stages", self.subsequent_years_stages.as_deref(), MAX_NOTES_LEN),
        ];
        for (field, value, max) in limited {
            if value.is_some_and(|v| v.chars().count() > max) {
                return Err(RegistryError::validation(
                    field,
                    format!("must not exceed {max} characters"),
                ));
            }
        }

        for (field, value) in [("cost", self.cost), ("cost_2025", self.cost_2025)] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(RegistryError::validation(field, "must be a non-negative number"));
            }
        }

        Ok(())
    }
}

/// Filters of the planned-list view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannedListQuery {
    /// Substring of the development name
    pub name: Option<String>,
    /// Exact development type
    pub development_type: Option<String>,
    /// Substring of the organizations field
    pub organization: Option<String>,
    /// 1-based page
    pub page: usize,
}

/// Outcome of moving the planned list into the active list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApprovalSummary {
    /// Planned items examined
    pub planned_items: usize,
    /// Active items created
    pub created: usize,
    /// Items whose code was already in the active list
    pub already_active: usize,
    /// Items lacking a code or a name
    pub incomplete: usize,
}

/// Planned-list operations
pub struct PlannedListService<P, A> {
    planned: Arc<P>,
    active: Arc<A>,
    config: RegistryConfig,
    block_locks: DashMap<String, Arc<Mutex<()>>>,
    fallback_lock: Mutex<()>,
    today: fn() -> NaiveDate,
}

impl<P, A> std::fmt::Debug for PlannedListService<P, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannedListService")
            .field("config", &self.config)
            .field("locked_blocks", &self.block_locks.len())
            .finish_non_exhaustive()
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl<P: PlannedStore, A: ActiveStore> PlannedListService<P, A> {
    /// Create service over the given stores
    #[must_use]
    pub fn new(planned: Arc<P>, active: Arc<A>, config: RegistryConfig) -> Self {
        Self {
            planned,
            active,
            config,
            block_locks: DashMap::new(),
            fallback_lock: Mutex::new(()),
            today: local_today,
        }
    }

    /// Replace the clock used for default dates
    #[must_use]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Service configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Paginated, department-scoped view of the planned list
    ///
    /// # Errors
    /// Permission denial or store failure.
    pub fn list(
        &self,
        user: Option<&User>,
        query: &PlannedListQuery,
    ) -> Result<Page<PlannedItem>, RegistryError> {
        ensure_permission(user, Permission::PlannedListView)?;

        let items = self.planned.all()?;
        let visible =
            DepartmentAccess::new().filter_by_department_access(RecordSet::new(&items), user);

        let name = non_empty(query.name.as_ref());
        let development_type = non_empty(query.development_type.as_ref());
        let organization = non_empty(query.organization.as_ref());

        let mut rows: Vec<PlannedItem> = visible
            .iter()
            .filter(|i| name.map_or(true, |n| contains_ci(Some(i.development_name.as_str()), n)))
            .filter(|i| development_type.map_or(true, |t| i.development_type.as_deref() == Some(t)))
            .filter(|i| organization.map_or(true, |o| contains_ci(i.organizations.as_deref(), o)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        Ok(Page::paginate(rows, query.page, self.config.page_size))
    }

    /// Preview the code the next item in `block` would receive
    ///
    /// # Errors
    /// [`RegistryError::Validation`] when `block` is blank.
    pub fn next_code(&self, user: Option<&User>, block: &str) -> Result<NextCode, RegistryError> {
        ensure_permission(user, Permission::PlannedListCreate)?;

        let block = block.trim();
        if block.is_empty() {
            return Err(RegistryError::validation("block", "block is required"));
        }

        let codes = self.planned.codes_in_block(block)?;
        next_code_for_block(&codes, block).ok_or_else(|| RegistryError::CodeExhausted {
            block: block.to_string(),
            attempts: 0,
        })
    }

    /// Create a planned item
    ///
    /// Non-admins have their own department written onto the record and
    /// cannot set costs.
    ///
    /// # Errors
    /// Permission or block denial, validation failure, or code exhaustion.
    pub fn create(
        &self,
        user: Option<&User>,
        mut input: PlannedItemInput,
    ) -> Result<PlannedItem, RegistryError> {
        ensure_permission(user, Permission::PlannedListCreate)?;
        let is_admin = user.is_some_and(User::is_admin);
        if !is_admin {
            input.department = user.and_then(|u| u.department.clone());
        }
        input.normalize_block();
        input.validate()?;
        self.guard_block(user, RequestKind::Create, input.block())?;

        let today = (self.today)();
        let start_date = input.development_start.unwrap_or(today);
        let end_date = input.development_end.unwrap_or_else(|| {
            today
                .checked_add_months(Months::new(12))
                .unwrap_or(today)
        });
        let (total_cost, cost_2025) = if is_admin {
            (input.cost, input.cost_2025)
        } else {
            (None, None)
        };

        let template = PlannedItem {
            id: ItemId(0),
            code: String::new(),
            designation: String::new(),
            development_name: input.development_name,
            development_type: input.development_type,
            document_type: input.document_type,
            organizations: input.organizations,
            block: input.block,
            department: input.department,
            author: input.author,
            page_count: input.page_count,
            development_start: input.development_start,
            development_end: input.development_end,
            start_date,
            end_date,
            total_cost,
            cost_2025,
            cost_2026: None,
            regulatory_documents: input.regulatory_documents,
            first_year_stages: input.first_year_stages,
            subsequent_years_stages: input.subsequent_years_stages,
        };

        let block = template.block.clone();
        let item = self.with_fresh_code(block.as_deref(), |code| {
            let mut item = template.clone();
            item.designation = code.clone();
            item.code = code;
            self.planned.insert(item)
        })?;

        tracing::info!(
            id = %item.id,
            code = %item.code,
            block = item.block.as_deref(),
            "planned item created"
        );
        Ok(item)
    }

    /// Update a planned item
    ///
    /// Moving the item to another block assigns a new code in that block;
    /// otherwise the code is kept.
    ///
    /// # Errors
    /// Permission, department or block denial, missing item, validation
    /// failure, or code exhaustion.
    pub fn update(
        &self,
        user: Option<&User>,
        id: ItemId,
        mut input: PlannedItemInput,
    ) -> Result<PlannedItem, RegistryError> {
        ensure_permission(user, Permission::PlannedListEdit)?;
        let existing = self.planned.get(id)?.ok_or(RegistryError::NotFound(id))?;
        ensure_department_access(user, existing.department.as_deref())?;

        let is_admin = user.is_some_and(User::is_admin);
        if !is_admin {
            input.department = user.and_then(|u| u.department.clone());
        }
        input.normalize_block();
        input.validate()?;
        self.guard_block(user, RequestKind::Replace, input.block())?;

        let block_changed = input
            .block()
            .is_some_and(|b| Some(b) != existing.block.as_deref());

        let mut item = existing.clone();
        item.development_name = input.development_name;
        item.development_type = input.development_type;
        item.document_type = input.document_type;
        item.organizations = input.organizations;
        item.block = input.block;
        item.department = input.department;
        item.author = input.author;
        item.page_count = input.page_count;
        item.development_start = input.development_start;
        item.development_end = input.development_end;
        item.start_date = input.development_start.unwrap_or(existing.start_date);
        item.end_date = input.development_end.unwrap_or(existing.end_date);
        item.regulatory_documents = input.regulatory_documents;
        item.first_year_stages = input.first_year_stages;
        item.subsequent_years_stages = input.subsequent_years_stages;
        if is_admin {
            item.total_cost = input.cost.or(existing.total_cost);
            item.cost_2025 = input.cost_2025.or(existing.cost_2025);
        }

        if block_changed {
            let block = item.block.clone();
            let updated = self.with_fresh_code(block.as_deref(), |code| {
                let mut candidate = item.clone();
                candidate.designation = code.clone();
                candidate.code = code;
                self.planned.update(candidate.clone()).map(|()| candidate)
            })?;
            tracing::info!(
                id = %id,
                from = %existing.code,
                to = %updated.code,
                "planned item moved to another block"
            );
            return Ok(updated);
        }

        if item.designation.is_empty() {
            item.designation = item.code.clone();
        }
        self.planned.update(item.clone())?;
        tracing::info!(id = %id, code = %item.code, "planned item updated");
        Ok(item)
    }

    /// Delete a planned item
    ///
    /// # Errors
    /// Permission or department denial, or missing item.
    pub fn delete(&self, user: Option<&User>, id: ItemId) -> Result<PlannedItem, RegistryError> {
        ensure_permission(user, Permission::PlannedListDelete)?;
        let existing = self.planned.get(id)?.ok_or(RegistryError::NotFound(id))?;
        ensure_department_access(user, existing.department.as_deref())?;

        let removed = self.planned.remove(id)?;
        tracing::info!(id = %id, code = %removed.code, "planned item deleted");
        Ok(removed)
    }

    /// Copy the planned list into the active list
    ///
    /// Items already active (by code) and items without code or name are
    /// skipped. All new active items are inserted in one batch.
    ///
    /// # Errors
    /// [`normreg_access::AccessError::AdminRequired`] for non-admins,
    /// [`RegistryError::NothingToApprove`] on an empty planned list.
    pub fn approve(&self, user: Option<&User>) -> Result<ApprovalSummary, RegistryError> {
        ensure_admin(user)?;

        let planned = self.planned.all()?;
        if planned.is_empty() {
            return Err(RegistryError::NothingToApprove);
        }

        let mut summary = ApprovalSummary {
            planned_items: planned.len(),
            ..ApprovalSummary::default()
        };
        let mut batch = Vec::new();
        for item in &planned {
            if self.active.contains_code(&item.code)? {
                summary.already_active += 1;
                continue;
            }
            if item.code.is_empty() || item.development_name.is_empty() {
                summary.incomplete += 1;
                continue;
            }
            batch.push(self.to_active(item));
        }

        summary.created = self.active.insert_batch(batch)?.len();
        tracing::info!(
            planned = summary.planned_items,
            created = summary.created,
            already_active = summary.already_active,
            incomplete = summary.incomplete,
            "planned list approved"
        );
        Ok(summary)
    }

    fn to_active(&self, item: &PlannedItem) -> ActiveItem {
        let start_date = item.development_start.map_or_else(
            || item.start_date.format("%Y-%m-%d").to_string(),
            |d| d.format("%d.%m.%Y").to_string(),
        );
        let end_date = item.development_end.map_or_else(
            || item.end_date.format("%Y-%m-%d").to_string(),
            |d| d.format("%d.%m.%Y").to_string(),
        );

        ActiveItem {
            id: ItemId(0),
            code: item.code.clone(),
            development_name: item.development_name.clone(),
            total_cost: item.total_cost.unwrap_or(0.0),
            cost_2025: item.cost_2025.unwrap_or(0.0),
            cost_2026: item.cost_2026.unwrap_or(0.0),
            start_date,
            end_date,
            organizations: item.organizations.clone().unwrap_or_default(),
            development_type: item.development_type.clone().unwrap_or_default(),
            current_stage: self.config.initial_active_stage.clone(),
        }
    }

    fn guard_block(
        &self,
        user: Option<&User>,
        kind: RequestKind,
        block: Option<&str>,
    ) -> Result<(), RegistryError> {
        if self.config.enforce_block_guard {
            guard_block_mutation(user, kind, block)?;
        }
        Ok(())
    }

    fn block_lock(&self, block: &str) -> Arc<Mutex<()>> {
        self.block_locks
            .entry(block.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `write` with a freshly computed code until it does not collide
    fn with_fresh_code<T>(
        &self,
        block: Option<&str>,
        mut write: impl FnMut(String) -> Result<T, StoreError>,
    ) -> Result<T, RegistryError> {
        let attempts = self.config.max_code_retries;

        match block {
            Some(block) => {
                let lock = self.block_lock(block);
                let result = {
                    let _guard = lock.lock();
                    self.assign_in_block(block, attempts, &mut write)
                };
                drop(lock);
                // nobody else holds or waits on the lock once only the map owns it
                self.block_locks.remove_if(block, |_, l| Arc::strong_count(l) == 1);
                result
            }
            None => {
                let _guard = self.fallback_lock.lock();
                let base = self.planned.count()?;

                for attempt in 1..=attempts {
                    let code = fallback_code(
                        &self.config.fallback_code_prefix,
                        self.config.fallback_code_width,
                        base + attempt as usize,
                    );
                    match write(code) {
                        Err(StoreError::DuplicateCode { code }) => {
                            tracing::warn!(%code, attempt, "fallback code collision, retrying");
                        }
                        other => return other.map_err(RegistryError::from),
                    }
                }

                Err(RegistryError::CodeExhausted {
                    block: String::new(),
                    attempts,
                })
            }
        }
    }

    /// Numbered attempts for `block`; the caller holds the block's lock
    fn assign_in_block<T>(
        &self,
        block: &str,
        attempts: u32,
        write: &mut impl FnMut(String) -> Result<T, StoreError>,
    ) -> Result<T, RegistryError> {
        let exhausted = || RegistryError::CodeExhausted {
            block: block.to_string(),
            attempts,
        };
        let mut last_tried = 0u64;

        for attempt in 1..=attempts {
            let codes = self.planned.codes_in_block(block)?;
            let mut next = next_code_for_block(&codes, block).ok_or_else(exhausted)?;
            if next.next <= last_tried {
                let forced = last_tried.checked_add(1).ok_or_else(exhausted)?;
                next = NextCode::new(block, forced);
            }
            last_tried = next.next;

            match write(next.code.clone()) {
                Err(StoreError::DuplicateCode { code }) => {
                    tracing::warn!(%code, block, attempt, "code collision, retrying");
                }
                other => return other.map_err(RegistryError::from),
            }
        }

        Err(exhausted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryActiveStore, MemoryPlannedStore};
    use normreg_test_utils::{admin, employee_with, fixture_date};

    type Service = PlannedListService<MemoryPlannedStore, MemoryActiveStore>;

    fn service() -> Service {
        PlannedListService::new(
            Arc::new(MemoryPlannedStore::new()),
            Arc::new(MemoryActiveStore::new()),
            RegistryConfig::default(),
        )
        .with_clock(fixture_date)
    }

    #[test]
    fn validation_requires_name() {
        let err = PlannedItemInput::named("   ").validate().unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation { field: "development_name", .. }
        ));
    }

    #[test]
    fn validation_checks_lengths_and_costs() {
        let mut input = PlannedItemInput::named("x");
        input.organizations = Some("o".repeat(501));
        assert!(input.validate().is_err());

        let input = PlannedItemInput::named("x").with_cost(-1.0);
        assert!(matches!(
            input.validate(),
            Err(RegistryError::Validation { field: "cost", .. })
        ));
    }

    #[test]
    fn default_dates_span_one_year() {
        let svc = service();
        let item = svc.create(Some(&admin()), PlannedItemInput::named("x")).unwrap();
        assert_eq!(item.start_date, fixture_date());
        assert_eq!(item.end_date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
    }

    #[test]
    fn fallback_code_skips_taken_ordinals() {
        let svc = service();
        let a = svc.create(Some(&admin()), PlannedItemInput::named("a")).unwrap();
        let b = svc.create(Some(&admin()), PlannedItemInput::named("b")).unwrap();
        assert_eq!(a.code, "PL-0001");
        assert_eq!(b.code, "PL-0002");

        // count drops to 1, so the first candidate is PL-0002 again
        svc.delete(Some(&admin()), a.id).unwrap();
        let c = svc.create(Some(&admin()), PlannedItemInput::named("c")).unwrap();
        assert_eq!(c.code, "PL-0003");
    }

    #[test]
    fn block_locks_are_released_after_use() {
        let svc = service();
        for block in ["1", "1.01", "free text block"] {
            svc.create(Some(&admin()), PlannedItemInput::named("x").with_block(block)).unwrap();
        }
        assert!(svc.block_locks.is_empty());
    }

    #[test]
    fn block_accessor_trims() {
        assert_eq!(PlannedItemInput::named("x").with_block(" 1.01 ").block(), Some("1.01"));
        assert_eq!(PlannedItemInput::named("x").with_block("   ").block(), None);
    }

    #[test]
    fn employee_cannot_set_costs() {
        let svc = service();
        let user = employee_with("1", "IT");
        let item = svc
            .create(Some(&user), PlannedItemInput::named("x").with_block("1.01").with_cost(100.0))
            .unwrap();
        assert_eq!(item.total_cost, None);
        assert_eq!(item.department.as_deref(), Some("IT"));
    }
}
