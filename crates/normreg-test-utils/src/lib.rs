//! Testing utilities for the normreg workspace
//!
//! Shared user and record fixtures.

#![allow(missing_docs)]

use chrono::NaiveDate;
use normreg_model::{ItemId, PlannedItem, User};

pub fn admin() -> User {
    User::admin("Administrator", "admin@arm.local")
}

pub fn employee_with_rank(rank: &str) -> User {
    User::employee(format!("Employee {rank}"), format!("rank{rank}@arm.local"))
        .with_block_rank(rank)
}

pub fn employee_in(department: &str) -> User {
    User::employee(format!("Employee of {department}"), "staff@arm.local")
        .with_department(department)
}

pub fn employee_with(rank: &str, department: &str) -> User {
    employee_with_rank(rank).with_department(department)
}

/// Fixed date used for records built here
pub fn fixture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap_or_default()
}

/// Planned item with the given code, block and department
pub fn planned_item(
    id: u64,
    code: &str,
    block: Option<&str>,
    department: Option<&str>,
) -> PlannedItem {
    PlannedItem {
        id: ItemId(id),
        code: code.to_string(),
        designation: code.to_string(),
        development_name: format!("Development {code}"),
        development_type: Some("new".to_string()),
        document_type: None,
        organizations: Some("Research Institute".to_string()),
        block: block.map(str::to_string),
        department: department.map(str::to_string),
        author: None,
        page_count: None,
        development_start: None,
        development_end: None,
        start_date: fixture_date(),
        end_date: fixture_date(),
        total_cost: None,
        cost_2025: None,
        cost_2026: None,
        regulatory_documents: None,
        first_year_stages: None,
        subsequent_years_stages: None,
    }
}

/// Planned items spread across blocks and departments
pub fn sample_planned_items() -> Vec<PlannedItem> {
    vec![
        planned_item(1, "2.1.01.1", Some("1.01"), Some("IT")),
        planned_item(2, "2.1.02.1", Some("1.02"), Some("QA")),
        planned_item(3, "2.1.1", Some("1"), Some("IT")),
        planned_item(4, "2.3.02.1", Some("3.02"), Some("Design")),
        planned_item(5, "2.6.10.1", Some("6.10"), Some("IT")),
        planned_item(6, "PL-0006", None, None),
    ]
}
