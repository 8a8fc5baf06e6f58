use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{
    compute_totals, today, EditDatePolicy, Expense, ExpenseId, ExpenseInput, FilterWindow,
};
use crate::storage::Repository;

use super::{AppError, AppState, CategorySummary, SummaryReport};

/// Application service providing the expense ledger operations.
/// This is the primary interface for any client (CLI, TUI, etc.).
pub struct LedgerService {
    repo: Repository,
    edit_policy: EditDatePolicy,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            edit_policy: EditDatePolicy::default(),
        }
    }

    /// Choose what an edit does with the original record's date.
    pub fn with_edit_policy(mut self, policy: EditDatePolicy) -> Self {
        self.edit_policy = policy;
        self
    }

    pub fn edit_policy(&self) -> EditDatePolicy {
        self.edit_policy
    }

    /// Open the database at the given path, creating the file and table if missing.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Expense operations
    // ========================

    /// List expenses for a filter window, newest first.
    pub async fn list_expenses(&self, filter: FilterWindow) -> Result<Vec<Expense>, AppError> {
        self.list_expenses_as_of(filter, today()).await
    }

    /// List expenses for a filter window evaluated relative to `today`.
    pub async fn list_expenses_as_of(
        &self,
        filter: FilterWindow,
        today: NaiveDate,
    ) -> Result<Vec<Expense>, AppError> {
        let from_date = filter.start_date(today);
        let expenses = self.repo.list_expenses(from_date).await?;
        debug!(%filter, count = expenses.len(), "loaded expenses");
        Ok(expenses)
    }

    /// Get a single expense.
    pub async fn get_expense(&self, id: ExpenseId) -> Result<Expense, AppError> {
        self.repo
            .get_expense(id)
            .await?
            .ok_or(AppError::ExpenseNotFound(id))
    }

    /// Record a new expense, or fully replace the one with `editing_id`.
    /// The record is dated today.
    pub async fn save_expense(
        &self,
        input: &ExpenseInput,
        editing_id: Option<ExpenseId>,
    ) -> Result<Expense, AppError> {
        self.save_expense_on(input, editing_id, today()).await
    }

    /// Like [`save_expense`](Self::save_expense), with an explicit write date.
    ///
    /// Nothing is written when the input fails validation.
    pub async fn save_expense_on(
        &self,
        input: &ExpenseInput,
        editing_id: Option<ExpenseId>,
        today: NaiveDate,
    ) -> Result<Expense, AppError> {
        let valid = input.validate().inspect_err(|err| {
            warn!(error = %err, "rejected expense input");
        })?;

        match editing_id {
            Some(id) => {
                let date = match self.edit_policy {
                    EditDatePolicy::ResetToToday => today,
                    EditDatePolicy::KeepOriginal => self.get_expense(id).await?.date,
                };
                if !self.repo.update_expense(id, &valid, date).await? {
                    return Err(AppError::ExpenseNotFound(id));
                }
                info!(
                    id,
                    amount = valid.amount_cents,
                    category = %valid.category,
                    "updated expense"
                );
                Ok(valid.into_expense(id, date))
            }
            None => {
                let id = self.repo.insert_expense(&valid, today).await?;
                info!(
                    id,
                    amount = valid.amount_cents,
                    category = %valid.category,
                    "recorded expense"
                );
                Ok(valid.into_expense(id, today))
            }
        }
    }

    /// Delete an expense. Deleting an id that does not exist is not an error.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<(), AppError> {
        if self.repo.delete_expense(id).await? {
            info!(id, "deleted expense");
        } else {
            debug!(id, "delete of unknown expense ignored");
        }
        Ok(())
    }

    /// Number of stored expenses across all dates.
    pub async fn count_expenses(&self) -> Result<i64, AppError> {
        Ok(self.repo.count_expenses().await?)
    }

    // ========================
    // Application state
    // ========================

    /// Reload the expenses and totals for the state's filter.
    pub async fn refresh(&self, state: &mut AppState) -> Result<(), AppError> {
        self.refresh_as_of(state, today()).await
    }

    pub async fn refresh_as_of(
        &self,
        state: &mut AppState,
        today: NaiveDate,
    ) -> Result<(), AppError> {
        let expenses = self.list_expenses_as_of(state.filter, today).await?;
        state.totals = compute_totals(&expenses);
        state.expenses = expenses;
        Ok(())
    }

    /// Switch the active filter and reload.
    pub async fn change_filter(
        &self,
        state: &mut AppState,
        filter: FilterWindow,
    ) -> Result<(), AppError> {
        state.filter = filter;
        self.refresh(state).await
    }

    /// Save the form, then clear it, leave edit mode and reload.
    /// When the input is rejected or the write fails the state is left as it was.
    /// A failed reload after a successful write leaves the form cleared, so
    /// resubmitting cannot record the expense twice.
    pub async fn submit(&self, state: &mut AppState) -> Result<Expense, AppError> {
        self.submit_on(state, today()).await
    }

    pub async fn submit_on(
        &self,
        state: &mut AppState,
        today: NaiveDate,
    ) -> Result<Expense, AppError> {
        let saved = self
            .save_expense_on(&state.form, state.editing_id, today)
            .await?;
        state.clear_form();
        self.refresh_as_of(state, today).await?;
        Ok(saved)
    }

    /// Delete an expense and reload. Leaves edit mode if that expense was being edited.
    pub async fn remove(&self, state: &mut AppState, id: ExpenseId) -> Result<(), AppError> {
        self.delete_expense(id).await?;
        if state.editing_id == Some(id) {
            state.cancel_edit();
        }
        self.refresh(state).await
    }

    // ========================
    // Reporting
    // ========================

    /// Per-category breakdown of the expenses in a filter window.
    pub async fn summary(&self, filter: FilterWindow) -> Result<SummaryReport, AppError> {
        self.summary_as_of(filter, today()).await
    }

    pub async fn summary_as_of(
        &self,
        filter: FilterWindow,
        today: NaiveDate,
    ) -> Result<SummaryReport, AppError> {
        let expenses = self.list_expenses_as_of(filter, today).await?;
        let totals = compute_totals(&expenses);

        let mut categories: Vec<CategorySummary> = totals
            .category_totals
            .iter()
            .map(|(category, &total)| {
                let count = expenses.iter().filter(|e| &e.category == category).count();
                CategorySummary {
                    category: category.clone(),
                    total,
                    count,
                    percentage: if totals.overall_total > 0 {
                        (total as f64 / totals.overall_total as f64) * 100.0
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        // Largest first, ties by name
        categories.sort_by(|a, b| b.total.cmp(&a.total).then(a.category.cmp(&b.category)));

        Ok(SummaryReport {
            filter,
            from_date: filter.start_date(today),
            as_of: today,
            total: totals.overall_total,
            count: expenses.len(),
            categories,
        })
    }
}
