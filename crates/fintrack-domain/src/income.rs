use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A recurring or one-off source of money coming in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSource {
    pub id: Uuid,
    pub name: String,
    /// Value of a single period at `frequency`.
    pub amount: f64,
    pub frequency: Frequency,
    /// Occurrence date (`YYYY-MM-DD`) of a one-time income.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Month (`YYYY-MM`) from which a recurring income counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

impl IncomeSource {
    pub fn new(name: impl Into<String>, amount: f64, frequency: Frequency) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            frequency,
            date: None,
            start_date: None,
        }
    }

    /// Builds a one-time income occurring on `date`.
    pub fn one_time(name: impl Into<String>, amount: f64, date: impl Into<String>) -> Self {
        let mut income = Self::new(name, amount, Frequency::OneTime);
        income.date = Some(date.into());
        income
    }

    pub fn starting(mut self, month: impl Into<String>) -> Self {
        self.start_date = Some(month.into());
        self
    }
}

impl Identifiable for IncomeSource {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for IncomeSource {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Amounted for IncomeSource {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Scheduled for IncomeSource {
    fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    fn occurrence_date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    fn start_month(&self) -> Option<&str> {
        self.start_date.as_deref()
    }
}
