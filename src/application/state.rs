use crate::domain::{
    format_cents, AggregateTotals, Cents, Expense, ExpenseId, ExpenseInput, FilterWindow,
};

/// Everything a front end needs to draw the expense screen.
///
/// Transitions that only touch the form are plain methods here; anything
/// that reads or writes the store goes through [`LedgerService`](super::LedgerService).
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub form: ExpenseInput,
    pub filter: FilterWindow,
    pub editing_id: Option<ExpenseId>,
    pub expenses: Vec<Expense>,
    pub totals: AggregateTotals,
}

impl AppState {
    pub fn new(filter: FilterWindow) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Enter edit mode for `expense`, pre-filling the form with its values.
    pub fn start_edit(&mut self, expense: &Expense) {
        self.editing_id = Some(expense.id);
        self.form = ExpenseInput {
            amount: format_cents(expense.amount_cents),
            category: expense.category.clone(),
            note: expense.note.clone().unwrap_or_default(),
        };
    }

    /// Leave edit mode and discard the form.
    pub fn cancel_edit(&mut self) {
        self.clear_form();
    }

    pub(crate) fn clear_form(&mut self) {
        self.editing_id = None;
        self.form = ExpenseInput::default();
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Save Changes"
        } else {
            "Add Expense"
        }
    }

    pub fn filter_label(&self) -> &'static str {
        self.filter.label()
    }

    /// Bars for the category chart.
    pub fn chart(&self) -> Vec<(String, Cents)> {
        self.totals.chart_series()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Expense {
        Expense {
            id: 7,
            amount_cents: 1250,
            category: "Food".to_string(),
            note: None,
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        }
    }

    #[test]
    fn test_start_and_cancel_edit() {
        let mut state = AppState::new(FilterWindow::ThisMonth);
        assert_eq!(state.submit_label(), "Add Expense");
        assert_eq!(state.filter_label(), "This Month");

        state.start_edit(&sample());
        assert_eq!(state.editing_id, Some(7));
        assert_eq!(state.form, ExpenseInput::new("12.50", "Food", ""));
        assert_eq!(state.submit_label(), "Save Changes");

        state.cancel_edit();
        assert!(!state.is_editing());
        assert_eq!(state.form, ExpenseInput::default());
        assert_eq!(state.filter, FilterWindow::ThisMonth);
    }

    #[test]
    fn test_start_edit_keeps_note() {
        let mut state = AppState::default();
        let expense = Expense {
            note: Some("coffee".to_string()),
            ..sample()
        };
        state.start_edit(&expense);
        assert_eq!(state.form.note, "coffee");
        assert_eq!(state.filter_label(), "All");
    }
}
