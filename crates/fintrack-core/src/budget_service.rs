//! Category budgets against what the expense records say will be spent.

use std::cmp::Ordering;

use chrono::Datelike;
use serde::Serialize;
use uuid::Uuid;

use fintrack_domain::{BelongsToCategory, Expense, FinanceState, MonthKey};

use crate::{frequency_service::FrequencyService, time::Clock};

/// Percentage at which a budget enters the warning band.
pub const WARNING_THRESHOLD: f64 = 80.0;
/// Percentage at which a budget is considered exhausted.
pub const OVER_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Good,
    Warning,
    Over,
}

impl BudgetStatus {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= OVER_THRESHOLD {
            BudgetStatus::Over
        } else if percent >= WARNING_THRESHOLD {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Good
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BudgetStatus::Good => "good",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Over => "over",
        }
    }
}

/// One row of the per-category budget report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: Uuid,
    pub name: String,
    pub color: String,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    /// `spent / budget * 100`, unclamped; zero when there is no budget.
    pub percent_used: f64,
    pub status: BudgetStatus,
}

pub struct BudgetService;

impl BudgetService {
    /// Expenses that reference `category_id`, active or not.
    pub fn expenses_in_category(state: &FinanceState, category_id: Uuid) -> Vec<&Expense> {
        state
            .expenses
            .iter()
            .filter(|expense| expense.category_id() == category_id)
            .collect()
    }

    /// What the category's expenses contribute to `month`.
    pub fn category_spend(state: &FinanceState, category_id: Uuid, month: MonthKey) -> f64 {
        state
            .expenses
            .iter()
            .filter(|expense| expense.category_id() == category_id)
            .map(|expense| FrequencyService::month_actual(expense, month))
            .sum()
    }

    /// Budget minus spend. Negative when over budget; unknown categories have no budget.
    pub fn category_remaining(state: &FinanceState, category_id: Uuid, month: MonthKey) -> f64 {
        let budget = state
            .category(category_id)
            .map_or(0.0, |category| category.budget);
        budget - Self::category_spend(state, category_id, month)
    }

    /// Sum of the raw category budgets. Budget periodicity is not taken into account.
    pub fn total_budget(state: &FinanceState) -> f64 {
        state
            .expense_categories
            .iter()
            .map(|category| category.budget)
            .sum()
    }

    /// Spend across every known category. Expenses pointing at missing categories are skipped.
    pub fn total_spent(state: &FinanceState, month: MonthKey) -> f64 {
        state
            .expense_categories
            .iter()
            .map(|category| Self::category_spend(state, category.id, month))
            .sum()
    }

    /// Share of the total budget spent in `month`, capped at 100.
    pub fn budget_percentage(state: &FinanceState, month: MonthKey) -> f64 {
        let budget = Self::total_budget(state);
        if budget <= 0.0 {
            return 0.0;
        }
        (Self::total_spent(state, month) / budget * 100.0).min(100.0)
    }

    /// How far through the current month today is, as a percentage.
    pub fn month_progress(clock: &dyn Clock) -> f64 {
        let today = clock.today();
        let month = MonthKey::from_date(today);
        let elapsed = f64::from(today.day() - 1);
        (elapsed / f64::from(month.days_in_month()) * 100.0).clamp(0.0, 100.0)
    }

    /// Month progress for any month: finished months are 100, future months 0.
    pub fn month_progress_for(month: MonthKey, clock: &dyn Clock) -> f64 {
        match month.cmp(&clock.current_month()) {
            Ordering::Less => 100.0,
            Ordering::Greater => 0.0,
            Ordering::Equal => Self::month_progress(clock),
        }
    }

    /// Budget, spend, and status of every category, largest spend first.
    pub fn category_breakdown(state: &FinanceState, month: MonthKey) -> Vec<CategoryBreakdown> {
        let mut rows: Vec<CategoryBreakdown> = state
            .expense_categories
            .iter()
            .map(|category| {
                let spent = Self::category_spend(state, category.id, month);
                let percent_used = if category.budget > 0.0 {
                    spent / category.budget * 100.0
                } else {
                    0.0
                };
                CategoryBreakdown {
                    category_id: category.id,
                    name: category.name.clone(),
                    color: category.color.clone(),
                    budget: category.budget,
                    spent,
                    remaining: category.budget - spent,
                    percent_used,
                    status: BudgetStatus::from_percent(percent_used),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.spent.partial_cmp(&a.spent).unwrap_or(Ordering::Equal));
        rows
    }
}
