//! Expense records and their scheduling metadata.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Money going out, attributed to an [`ExpenseCategory`](crate::ExpenseCategory).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    /// May reference a category that has since been removed.
    pub category_id: Uuid,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Restricts the expense to exactly this month (`YYYY-MM`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl Expense {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        category_id: Uuid,
        frequency: Frequency,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            category_id,
            frequency,
            date: None,
            start_date: None,
            month: None,
        }
    }

    pub fn one_time(
        name: impl Into<String>,
        amount: f64,
        category_id: Uuid,
        date: impl Into<String>,
    ) -> Self {
        let mut expense = Self::new(name, amount, category_id, Frequency::OneTime);
        expense.date = Some(date.into());
        expense
    }

    pub fn starting(mut self, month: impl Into<String>) -> Self {
        self.start_date = Some(month.into());
        self
    }

    pub fn pinned_to(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Expense {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl BelongsToCategory for Expense {
    fn category_id(&self) -> Uuid {
        self.category_id
    }
}

impl Scheduled for Expense {
    fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    fn occurrence_date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    fn start_month(&self) -> Option<&str> {
        self.start_date.as_deref()
    }

    fn pinned_month(&self) -> Option<&str> {
        self.month.as_deref()
    }
}
