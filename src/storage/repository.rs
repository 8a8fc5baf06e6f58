use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use crate::domain::{
    cents_from_real, cents_to_real, parse_iso, to_iso, Expense, ExpenseId, ValidExpense,
};

use super::MIGRATION_001_EXPENSES;

const GET_EXPENSE: &str = "SELECT id, amount, category, note, date FROM expenses WHERE id = ?";
const LIST_EXPENSES: &str =
    "SELECT id, amount, category, note, date FROM expenses ORDER BY id DESC";
const LIST_EXPENSES_FROM: &str =
    "SELECT id, amount, category, note, date FROM expenses WHERE date >= ? ORDER BY id DESC";

/// Repository for persisting and querying expenses.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Create the expenses table if it is missing.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_EXPENSES)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Insert a new expense and return its assigned id.
    pub async fn insert_expense(
        &self,
        expense: &ValidExpense,
        date: NaiveDate,
    ) -> Result<ExpenseId> {
        let result = sqlx::query(
            "INSERT INTO expenses (amount, category, note, date) VALUES (?, ?, ?, ?)",
        )
        .bind(cents_to_real(expense.amount_cents))
        .bind(&expense.category)
        .bind(&expense.note)
        .bind(to_iso(date))
        .execute(&self.pool)
        .await
        .context("Failed to insert expense")?;

        Ok(result.last_insert_rowid())
    }

    /// Replace every mutable field of an expense.
    /// Returns false when no row has the given id.
    pub async fn update_expense(
        &self,
        id: ExpenseId,
        expense: &ValidExpense,
        date: NaiveDate,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE expenses SET amount = ?, category = ?, note = ?, date = ? WHERE id = ?",
        )
        .bind(cents_to_real(expense.amount_cents))
        .bind(&expense.category)
        .bind(&expense.note)
        .bind(to_iso(date))
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update expense")?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an expense. Returns false when no row had the given id.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete expense")?;

        Ok(result.rows_affected() > 0)
    }

    /// Get an expense by id.
    pub async fn get_expense(&self, id: ExpenseId) -> Result<Option<Expense>> {
        let row = sqlx::query(GET_EXPENSE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch expense")?;

        row.as_ref().map(Self::row_to_expense).transpose()
    }

    /// List expenses newest first, optionally only those dated on or after `from_date`.
    pub async fn list_expenses(&self, from_date: Option<NaiveDate>) -> Result<Vec<Expense>> {
        let rows = match from_date {
            Some(from) => {
                debug!(from = %to_iso(from), "listing expenses from date");
                sqlx::query(LIST_EXPENSES_FROM)
                    .bind(to_iso(from))
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                debug!("listing all expenses");
                sqlx::query(LIST_EXPENSES)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// Number of stored expenses.
    pub async fn count_expenses(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM expenses")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count expenses")?;
        Ok(row.get("count"))
    }

    fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<Expense> {
        let id: ExpenseId = row.get("id");
        let date_str: String = row.get("date");

        // A non-numeric amount counts as zero rather than failing the whole listing
        let amount_cents = match row.try_get::<f64, _>("amount") {
            Ok(amount) => cents_from_real(amount),
            Err(err) => {
                warn!(id, error = %err, "expense has a non-numeric amount, counting it as zero");
                0
            }
        };

        Ok(Expense {
            id,
            amount_cents,
            category: row.get("category"),
            note: row.get("note"),
            date: parse_iso(&date_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid date for expense {}: {}", id, date_str))?,
        })
    }
}
