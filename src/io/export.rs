use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{LedgerService, SummaryReport};
use crate::domain::{compute_totals, format_cents, AggregateTotals, Expense, FilterWindow};

/// JSON document written by [`Exporter::export_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub filter: FilterWindow,
    pub expenses: Vec<Expense>,
    pub totals: AggregateTotals,
}

/// Exporter for writing the expenses of a filter window to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export expenses to CSV format, newest first. Returns the number of rows written.
    pub async fn export_csv<W: Write>(&self, filter: FilterWindow, writer: W) -> Result<usize> {
        let expenses = self.service.list_expenses(filter).await?;
        write_csv(&expenses, writer)?;
        Ok(expenses.len())
    }

    /// Export expenses and their totals as a pretty-printed JSON snapshot.
    pub async fn export_json<W: Write>(
        &self,
        filter: FilterWindow,
        mut writer: W,
    ) -> Result<ExpenseSnapshot> {
        let expenses = self.service.list_expenses(filter).await?;
        let totals = compute_totals(&expenses);

        let snapshot = ExpenseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            filter,
            expenses,
            totals,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}

/// Write expenses as CSV with a header row.
pub fn write_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["id", "date", "amount", "category", "note"])?;

    for expense in expenses {
        csv_writer.write_record([
            expense.id.to_string(),
            expense.date.to_string(),
            expense.formatted_amount(),
            expense.category.clone(),
            expense.note.clone().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the per-category rows of a summary as CSV with a header row.
pub fn write_summary_csv<W: Write>(report: &SummaryReport, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["category", "total", "count", "percentage"])?;

    for cat in &report.categories {
        csv_writer.write_record([
            cat.category.clone(),
            format_cents(cat.total),
            cat.count.to_string(),
            format!("{:.2}", cat.percentage),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::CategorySummary;
    use chrono::NaiveDate;

    #[test]
    fn test_write_summary_csv_quotes_categories() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let report = SummaryReport {
            filter: FilterWindow::All,
            from_date: None,
            as_of: today,
            total: 2000,
            count: 3,
            categories: vec![
                CategorySummary {
                    category: "Food, drinks".to_string(),
                    total: 1500,
                    count: 2,
                    percentage: 75.0,
                },
                CategorySummary {
                    category: "Books".to_string(),
                    total: 500,
                    count: 1,
                    percentage: 25.0,
                },
            ],
        };

        let mut out = Vec::new();
        write_summary_csv(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "category,total,count,percentage\n\"Food, drinks\",15.00,2,75.00\nBooks,5.00,1,25.00\n"
        );
    }

    #[test]
    fn test_write_csv_quotes_fields() {
        let expenses = vec![Expense {
            id: 3,
            amount_cents: 700,
            category: "Food".to_string(),
            note: Some("coffee, large".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        }];

        let mut out = Vec::new();
        write_csv(&expenses, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "id,date,amount,category,note\n3,2026-10-19,7.00,Food,\"coffee, large\"\n"
        );
    }
}
