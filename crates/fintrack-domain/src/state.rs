//! The complete finance document: every record plus the monthly cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    category::{ExpenseCategory, UNCATEGORIZED_LABEL},
    common::MonthKey,
    expense::Expense,
    income::IncomeSource,
    monthly::MonthlyData,
    settings::AppSettings,
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Serializable snapshot of one user's finances.
///
/// Values of this type are passed explicitly to every calculation; there is no
/// process-wide store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinanceState {
    #[serde(default)]
    pub income_sources: Vec<IncomeSource>,
    #[serde(default)]
    pub expense_categories: Vec<ExpenseCategory>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub monthly_data: Vec<MonthlyData>,
    #[serde(default)]
    pub settings: AppSettings,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default = "FinanceState::schema_version_default")]
    pub schema_version: u8,
}

impl Default for FinanceState {
    fn default() -> Self {
        Self::new()
    }
}

impl FinanceState {
    /// Creates an empty state with no categories.
    pub fn new() -> Self {
        Self {
            income_sources: Vec::new(),
            expense_categories: Vec::new(),
            expenses: Vec::new(),
            monthly_data: Vec::new(),
            settings: AppSettings::default(),
            updated_at: Utc::now(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Creates a state seeded with [`ExpenseCategory::defaults`].
    pub fn with_default_categories() -> Self {
        let mut state = Self::new();
        state.expense_categories = ExpenseCategory::defaults();
        state
    }

    pub fn income(&self, id: Uuid) -> Option<&IncomeSource> {
        self.income_sources.iter().find(|income| income.id == id)
    }

    pub fn income_mut(&mut self, id: Uuid) -> Option<&mut IncomeSource> {
        self.income_sources.iter_mut().find(|income| income.id == id)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expense_mut(&mut self, id: Uuid) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|expense| expense.id == id)
    }

    pub fn category(&self, id: Uuid) -> Option<&ExpenseCategory> {
        self.expense_categories
            .iter()
            .find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut ExpenseCategory> {
        self.expense_categories
            .iter_mut()
            .find(|category| category.id == id)
    }

    /// Category name for display, falling back to "Uncategorized" for dangling ids.
    pub fn category_label(&self, id: Uuid) -> &str {
        self.category(id)
            .map(|category| category.name.as_str())
            .unwrap_or(UNCATEGORIZED_LABEL)
    }

    pub fn monthly_data_for(&self, month: MonthKey) -> Option<&MonthlyData> {
        self.monthly_data.iter().find(|data| data.month() == month)
    }

    /// Inserts `data`, or overwrites the figures of the existing entry for its month.
    pub fn upsert_monthly_data(&mut self, data: MonthlyData) {
        match self
            .monthly_data
            .iter_mut()
            .find(|existing| existing.month() == data.month())
        {
            Some(existing) => existing.replace_figures(&data),
            None => self.monthly_data.push(data),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
