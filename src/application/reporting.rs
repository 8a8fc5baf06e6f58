use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, FilterWindow};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub filter: FilterWindow,
    /// First date included, `None` for the unbounded window.
    pub from_date: Option<NaiveDate>,
    pub as_of: NaiveDate,
    pub total: Cents,
    pub count: usize,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    pub percentage: f64,
}
