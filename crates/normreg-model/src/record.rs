//! Work-item records of the planned and active lists

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record attribute an access rule can be evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeField {
    /// Block taxonomy code
    Block,
    /// Department label
    Department,
}

impl ScopeField {
    /// Column name of the field
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ScopeField::Block => "block",
            ScopeField::Department => "department",
        }
    }
}

/// A record carrying block and/or department attributes
pub trait Scoped {
    /// Value of `field`, `None` when the record has no such attribute or it
    /// is unset
    fn scope_value(&self, field: ScopeField) -> Option<&str>;
}

/// Entry of the planned list (proposals for new work)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedItem {
    pub id: ItemId,
    /// Persisted identifier, `2.<block>.<seq>` or a fallback code
    pub code: String,
    pub designation: String,
    pub development_name: String,
    pub development_type: Option<String>,
    pub document_type: Option<String>,
    pub organizations: Option<String>,
    pub block: Option<String>,
    pub department: Option<String>,
    pub author: Option<String>,
    pub page_count: Option<u32>,
    pub development_start: Option<NaiveDate>,
    pub development_end: Option<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Option<f64>,
    pub cost_2025: Option<f64>,
    pub cost_2026: Option<f64>,
    pub regulatory_documents: Option<String>,
    pub first_year_stages: Option<String>,
    pub subsequent_years_stages: Option<String>,
}

impl Scoped for PlannedItem {
    fn scope_value(&self, field: ScopeField) -> Option<&str> {
        match field {
            ScopeField::Block => self.block.as_deref(),
            ScopeField::Department => self.department.as_deref(),
        }
    }
}

/// Entry of the active list (approved, in-progress work)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveItem {
    pub id: ItemId,
    pub code: String,
    pub development_name: String,
    pub total_cost: f64,
    pub cost_2025: f64,
    pub cost_2026: f64,
    /// Start date as displayed, `dd.mm.yyyy` when known
    pub start_date: String,
    pub end_date: String,
    pub organizations: String,
    pub development_type: String,
    pub current_stage: String,
}
