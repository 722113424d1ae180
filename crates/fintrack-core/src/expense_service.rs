use tracing::info;
use uuid::Uuid;

use fintrack_domain::{Expense, FinanceState};

use crate::{
    summary_service::SummaryService,
    time::Clock,
    validation::{validate_amount, validate_name},
    CoreError, CoreResult,
};

/// Create, update, and delete expenses.
///
/// The category reference is not checked: an expense may point at a category
/// that does not exist and is then reported as uncategorized.
pub struct ExpenseService;

impl ExpenseService {
    pub fn add(state: &FinanceState, expense: Expense, clock: &dyn Clock) -> CoreResult<FinanceState> {
        Self::validate(&expense)?;
        let mut next = state.clone();
        info!(
            id = %expense.id,
            name = %expense.name,
            category = next.category_label(expense.category_id),
            "adding expense"
        );
        next.expenses.push(expense);
        Ok(Self::finish(next, clock))
    }

    /// Replaces every field of the expense `id` except the id itself.
    pub fn update(
        state: &FinanceState,
        id: Uuid,
        changes: Expense,
        clock: &dyn Clock,
    ) -> CoreResult<FinanceState> {
        Self::validate(&changes)?;
        let mut next = state.clone();
        let expense = next.expense_mut(id).ok_or(CoreError::ExpenseNotFound(id))?;
        expense.name = changes.name;
        expense.amount = changes.amount;
        expense.category_id = changes.category_id;
        expense.frequency = changes.frequency;
        expense.date = changes.date;
        expense.start_date = changes.start_date;
        expense.month = changes.month;
        info!(%id, "updated expense");
        Ok(Self::finish(next, clock))
    }

    pub fn delete(state: &FinanceState, id: Uuid, clock: &dyn Clock) -> CoreResult<FinanceState> {
        let mut next = state.clone();
        let before = next.expenses.len();
        next.expenses.retain(|expense| expense.id != id);
        if next.expenses.len() == before {
            return Err(CoreError::ExpenseNotFound(id));
        }
        info!(%id, "deleted expense");
        Ok(Self::finish(next, clock))
    }

    pub fn list(state: &FinanceState) -> Vec<&Expense> {
        state.expenses.iter().collect()
    }

    fn validate(expense: &Expense) -> CoreResult<()> {
        validate_name("Expense", &expense.name)?;
        validate_amount("Expense amount", expense.amount)?;
        if !expense.frequency.is_recognized() {
            return Err(CoreError::Validation(format!(
                "Unknown expense frequency `{}`",
                expense.frequency
            )));
        }
        Ok(())
    }

    fn finish(mut next: FinanceState, clock: &dyn Clock) -> FinanceState {
        SummaryService::recompute_and_store(&mut next, clock.current_month());
        next.touch();
        next
    }
}
