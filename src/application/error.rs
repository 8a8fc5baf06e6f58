use thiserror::Error;

use crate::domain::{ExpenseId, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    /// True when the error came from user input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}
