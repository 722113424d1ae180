//! Monthly aggregation of income and expense records.

use tracing::debug;

use fintrack_domain::{FinanceState, MonthKey, MonthlyData};

use crate::frequency_service::FrequencyService;

/// Steady-state monthly figures: every recurring record normalized, one-time
/// records excluded and start months ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyState {
    pub income: f64,
    pub expenses: f64,
}

impl SteadyState {
    pub fn savings(&self) -> f64 {
        self.income - self.expenses
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Sums every record's contribution to `month`. Does not touch the cache.
    pub fn compute_month(state: &FinanceState, month: MonthKey) -> MonthlyData {
        let income: f64 = state
            .income_sources
            .iter()
            .map(|income| FrequencyService::month_actual(income, month))
            .sum();
        let expenses: f64 = state
            .expenses
            .iter()
            .map(|expense| FrequencyService::month_actual(expense, month))
            .sum();
        MonthlyData::from_projection(month, income, expenses)
    }

    /// Computes `month` and writes the result into the state's monthly cache.
    pub fn recompute_and_store(state: &mut FinanceState, month: MonthKey) -> MonthlyData {
        let data = Self::compute_month(state, month);
        debug!(
            %month,
            income = data.projected_income(),
            expenses = data.projected_expenses(),
            "recomputed monthly data"
        );
        state.upsert_monthly_data(data.clone());
        data
    }

    pub fn get_monthly_data(state: &FinanceState, month: MonthKey) -> Option<&MonthlyData> {
        state.monthly_data_for(month)
    }

    /// Cached projected savings for `month`, zero when nothing is recorded.
    pub fn projected_savings(state: &FinanceState, month: MonthKey) -> f64 {
        state
            .monthly_data_for(month)
            .map_or(0.0, MonthlyData::projected_savings)
    }

    /// Cached actual savings for `month`, zero when nothing is recorded.
    pub fn actual_savings(state: &FinanceState, month: MonthKey) -> f64 {
        state
            .monthly_data_for(month)
            .map_or(0.0, MonthlyData::actual_savings)
    }

    pub fn steady_state(state: &FinanceState) -> SteadyState {
        SteadyState {
            income: state
                .income_sources
                .iter()
                .map(FrequencyService::record_monthly_equivalent)
                .sum(),
            expenses: state
                .expenses
                .iter()
                .map(FrequencyService::record_monthly_equivalent)
                .sum(),
        }
    }
}
