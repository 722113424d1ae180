//! Cached per-month aggregates.

use serde::{Deserialize, Serialize};

use crate::common::MonthKey;

/// Income, expense, and savings figures for one calendar month.
///
/// Savings are always derived from income and expenses by the constructors (and
/// re-derived when a document is loaded), so they cannot drift from their inputs.
///
/// There is no transaction ledger behind the "actual" figures yet: the
/// aggregator fills them with the projected values. They exist so that a future
/// ledger of observed transactions can populate them without a schema change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "MonthlyDataRecord")]
pub struct MonthlyData {
    month: MonthKey,
    projected_income: f64,
    actual_income: f64,
    projected_expenses: f64,
    actual_expenses: f64,
    projected_savings: f64,
    actual_savings: f64,
}

impl MonthlyData {
    /// Builds an entry whose actual figures mirror the projected ones.
    pub fn from_projection(month: MonthKey, income: f64, expenses: f64) -> Self {
        Self::with_actuals(month, income, expenses, income, expenses)
    }

    pub fn with_actuals(
        month: MonthKey,
        projected_income: f64,
        projected_expenses: f64,
        actual_income: f64,
        actual_expenses: f64,
    ) -> Self {
        Self {
            month,
            projected_income,
            actual_income,
            projected_expenses,
            actual_expenses,
            projected_savings: projected_income - projected_expenses,
            actual_savings: actual_income - actual_expenses,
        }
    }

    pub fn empty(month: MonthKey) -> Self {
        Self::with_actuals(month, 0.0, 0.0, 0.0, 0.0)
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn projected_income(&self) -> f64 {
        self.projected_income
    }

    pub fn projected_expenses(&self) -> f64 {
        self.projected_expenses
    }

    pub fn projected_savings(&self) -> f64 {
        self.projected_savings
    }

    pub fn actual_income(&self) -> f64 {
        self.actual_income
    }

    pub fn actual_expenses(&self) -> f64 {
        self.actual_expenses
    }

    pub fn actual_savings(&self) -> f64 {
        self.actual_savings
    }

    /// Overwrites the figures in place, keeping the month key.
    pub fn replace_figures(&mut self, other: &MonthlyData) {
        let month = self.month;
        *self = other.clone();
        self.month = month;
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonthlyDataRecord {
    month: MonthKey,
    #[serde(default)]
    projected_income: f64,
    #[serde(default)]
    actual_income: f64,
    #[serde(default)]
    projected_expenses: f64,
    #[serde(default)]
    actual_expenses: f64,
}

impl From<MonthlyDataRecord> for MonthlyData {
    fn from(record: MonthlyDataRecord) -> Self {
        MonthlyData::with_actuals(
            record.month,
            record.projected_income,
            record.projected_expenses,
            record.actual_income,
            record.actual_expenses,
        )
    }
}
