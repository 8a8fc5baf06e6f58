use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Cents, Expense};

/// Sums derived from a set of expenses. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTotals {
    pub overall_total: Cents,
    /// Keyed by the exact category string; "Food" and "food" are separate.
    pub category_totals: BTreeMap<String, Cents>,
}

impl AggregateTotals {
    pub fn is_empty(&self) -> bool {
        self.category_totals.is_empty()
    }

    pub fn category_total(&self, category: &str) -> Cents {
        self.category_totals.get(category).copied().unwrap_or(0)
    }

    /// Bars for a category chart as `(label, value)` pairs, ordered by label.
    pub fn chart_series(&self) -> Vec<(String, Cents)> {
        self.category_totals
            .iter()
            .map(|(category, total)| (category.clone(), *total))
            .collect()
    }
}

/// Sum a set of expenses overall and per category.
/// The result does not depend on the order of `expenses`.
/// Sums saturate instead of overflowing.
pub fn compute_totals(expenses: &[Expense]) -> AggregateTotals {
    expenses
        .iter()
        .fold(AggregateTotals::default(), |mut totals, expense| {
            totals.overall_total = totals.overall_total.saturating_add(expense.amount_cents);
            let category_total = totals
                .category_totals
                .entry(expense.category.clone())
                .or_insert(0);
            *category_total = category_total.saturating_add(expense.amount_cents);
            totals
        })
}
