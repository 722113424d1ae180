//! Domain types representing expense categories and their budgets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Display label used when an expense points at a category that no longer exists.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Groups expenses for budgeting and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    /// Spending ceiling expressed in `periodicity` units.
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub periodicity: BudgetPeriod,
}

impl ExpenseCategory {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
            budget: 0.0,
            periodicity: BudgetPeriod::Monthly,
        }
    }

    pub fn with_budget(mut self, budget: f64, periodicity: BudgetPeriod) -> Self {
        self.budget = budget;
        self.periodicity = periodicity;
        self
    }

    /// Returns `true` when a positive budget has been assigned.
    pub fn has_budget(&self) -> bool {
        self.budget > 0.0
    }

    /// The starter set offered to new users, all budgeted monthly.
    pub fn defaults() -> Vec<ExpenseCategory> {
        [
            ("Housing", "#FF5733", 1000.0),
            ("Transportation", "#33FF57", 300.0),
            ("Food", "#3357FF", 500.0),
            ("Utilities", "#F3FF33", 200.0),
            ("Entertainment", "#FF33F3", 150.0),
            ("Healthcare", "#33FFF3", 200.0),
            ("Personal", "#FF8C33", 100.0),
            ("Debt", "#8C33FF", 300.0),
        ]
        .into_iter()
        .map(|(name, color, budget)| {
            ExpenseCategory::new(name, color).with_budget(budget, BudgetPeriod::Monthly)
        })
        .collect()
    }
}

impl Identifiable for ExpenseCategory {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for ExpenseCategory {
    fn name(&self) -> &str {
        &self.name
    }
}
