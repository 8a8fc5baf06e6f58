use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{format_cents, parse_cents, Cents, ParseCentsError, MAX_AMOUNT_CENTS};

/// Row id assigned by the store on insert.
pub type ExpenseId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount_cents: Cents,
    pub category: String,
    pub note: Option<String>,
    pub date: NaiveDate,
}

impl Expense {
    pub fn formatted_amount(&self) -> String {
        format_cents(self.amount_cents)
    }
}

/// Raw expense fields as typed by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseInput {
    pub amount: String,
    pub category: String,
    pub note: String,
}

impl ExpenseInput {
    pub fn new(
        amount: impl Into<String>,
        category: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
            note: note.into(),
        }
    }

    /// Validate and normalize the input.
    ///
    /// The amount must parse as a decimal with at most two decimal places,
    /// greater than zero and no larger than [`MAX_AMOUNT_CENTS`]. The
    /// category must be non-empty once trimmed. A blank note becomes `None`.
    pub fn validate(&self) -> Result<ValidExpense, ValidationError> {
        let amount_cents = parse_cents(&self.amount).map_err(|err| match err {
            ParseCentsError::TooManyDecimals => ValidationError::TooManyDecimals,
            ParseCentsError::Overflow => ValidationError::AmountTooLarge,
            ParseCentsError::InvalidFormat => {
                ValidationError::InvalidAmount(self.amount.trim().to_string())
            }
        })?;
        if amount_cents <= 0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if amount_cents > MAX_AMOUNT_CENTS {
            return Err(ValidationError::AmountTooLarge);
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        let note = self.note.trim();

        Ok(ValidExpense {
            amount_cents,
            category: category.to_string(),
            note: (!note.is_empty()).then(|| note.to_string()),
        })
    }
}

/// Expense fields that passed validation; everything but id and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidExpense {
    pub amount_cents: Cents,
    pub category: String,
    pub note: Option<String>,
}

impl ValidExpense {
    pub fn into_expense(self, id: ExpenseId, date: NaiveDate) -> Expense {
        Expense {
            id,
            amount_cents: self.amount_cents,
            category: self.category,
            note: self.note,
            date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid amount: '{0}' is not a number")]
    InvalidAmount(String),

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Amount may have at most two decimal places")]
    TooManyDecimals,

    #[error("Amount is too large")]
    AmountTooLarge,

    #[error("Category must not be empty")]
    EmptyCategory,
}

/// What an edit does with the date of the record it replaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditDatePolicy {
    /// Edited records are re-dated to the day of the edit.
    #[default]
    ResetToToday,
    /// Edited records keep the date they were first recorded on.
    KeepOriginal,
}
