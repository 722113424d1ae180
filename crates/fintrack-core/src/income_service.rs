use tracing::info;
use uuid::Uuid;

use fintrack_domain::{FinanceState, IncomeSource};

use crate::{
    summary_service::SummaryService,
    time::Clock,
    validation::{validate_amount, validate_name},
    CoreError, CoreResult,
};

/// Create, update, and delete income sources.
///
/// Every call works on a copy of `state` and returns it with the current month's
/// monthly data recomputed. On error the input is left as it was.
pub struct IncomeService;

impl IncomeService {
    pub fn add(
        state: &FinanceState,
        income: IncomeSource,
        clock: &dyn Clock,
    ) -> CoreResult<FinanceState> {
        Self::validate(&income)?;
        let mut next = state.clone();
        info!(id = %income.id, name = %income.name, "adding income source");
        next.income_sources.push(income);
        Ok(Self::finish(next, clock))
    }

    /// Replaces every field of the income `id` except the id itself.
    pub fn update(
        state: &FinanceState,
        id: Uuid,
        changes: IncomeSource,
        clock: &dyn Clock,
    ) -> CoreResult<FinanceState> {
        Self::validate(&changes)?;
        let mut next = state.clone();
        let income = next.income_mut(id).ok_or(CoreError::IncomeNotFound(id))?;
        income.name = changes.name;
        income.amount = changes.amount;
        income.frequency = changes.frequency;
        income.date = changes.date;
        income.start_date = changes.start_date;
        info!(%id, "updated income source");
        Ok(Self::finish(next, clock))
    }

    pub fn delete(state: &FinanceState, id: Uuid, clock: &dyn Clock) -> CoreResult<FinanceState> {
        let mut next = state.clone();
        let before = next.income_sources.len();
        next.income_sources.retain(|income| income.id != id);
        if next.income_sources.len() == before {
            return Err(CoreError::IncomeNotFound(id));
        }
        info!(%id, "deleted income source");
        Ok(Self::finish(next, clock))
    }

    pub fn list(state: &FinanceState) -> Vec<&IncomeSource> {
        state.income_sources.iter().collect()
    }

    fn validate(income: &IncomeSource) -> CoreResult<()> {
        validate_name("Income", &income.name)?;
        validate_amount("Income amount", income.amount)?;
        if !income.frequency.allowed_for_income() {
            return Err(CoreError::Validation(format!(
                "Income cannot have frequency `{}`",
                income.frequency
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
