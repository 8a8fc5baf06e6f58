// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use outlay::application::LedgerService;
use outlay::domain::{Expense, ExpenseInput};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Path of the database file inside a test directory
pub fn db_path(temp_dir: &TempDir) -> String {
    temp_dir.path().join("test.db").to_str().unwrap().to_string()
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Record an expense as if it had been entered on `date`
pub async fn add_on(
    service: &LedgerService,
    amount: &str,
    category: &str,
    note: &str,
    date: &str,
) -> Result<Expense> {
    Ok(service
        .save_expense_on(
            &ExpenseInput::new(amount, category, note),
            None,
            parse_date(date),
        )
        .await?)
}

/// Record an expense dated today
pub async fn add(
    service: &LedgerService,
    amount: &str,
    category: &str,
    note: &str,
) -> Result<Expense> {
    Ok(service
        .save_expense(&ExpenseInput::new(amount, category, note), None)
        .await?)
}
