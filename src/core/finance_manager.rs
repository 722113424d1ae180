use tracing::{info, warn};
use uuid::Uuid;

use fintrack_core::{
    storage::{state_warnings, FinanceStorage, StateBackupInfo},
    BudgetService, CategoryBreakdown, CategoryService, Clock, CumulativePoint, ExpenseService,
    ForecastService, IncomeService, ProjectionEntry, ProjectionOrder, ProjectionRange,
    SummaryService,
};
use fintrack_domain::{
    AppSettings, Expense, ExpenseCategory, FinanceState, IncomeSource, MonthKey, MonthlyData,
};

use crate::{
    currency,
    errors::{FinanceError, FinanceResult},
};

/// Facade that owns the working finance document and keeps it persisted.
///
/// Every mutation goes through the core services, which return a new state. The
/// new state is written to storage first and only replaces the working copy once
/// the write succeeded, so a failed call leaves both untouched.
pub struct FinanceManager {
    state: FinanceState,
    key: String,
    storage: Box<dyn FinanceStorage>,
    clock: Box<dyn Clock>,
}

impl FinanceManager {
    /// Loads the document stored under `key`, or starts a fresh one seeded with
    /// the default categories. A fresh document is not written until the first change.
    pub fn open(
        storage: Box<dyn FinanceStorage>,
        clock: Box<dyn Clock>,
        key: impl Into<String>,
    ) -> FinanceResult<Self> {
        let key = key.into();
        let state = if storage.state_exists(&key) {
            let state = storage.load_state(&key)?;
            info!(%key, incomes = state.income_sources.len(), expenses = state.expenses.len(), "loaded finance state");
            state
        } else {
            info!(%key, "no stored finance state, starting with default categories");
            FinanceState::with_default_categories()
        };
        Ok(Self::with_state(storage, clock, key, state))
    }

    pub fn with_state(
        storage: Box<dyn FinanceStorage>,
        clock: Box<dyn Clock>,
        key: impl Into<String>,
        state: FinanceState,
    ) -> Self {
        Self {
            state,
            key: key.into(),
            storage,
            clock,
        }
    }

    pub fn state(&self) -> &FinanceState {
        &self.state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &dyn FinanceStorage {
        self.storage.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn current_month(&self) -> MonthKey {
        self.clock.current_month()
    }

    pub fn settings(&self) -> &AppSettings {
        &self.state.settings
    }

    pub fn warnings(&self) -> Vec<String> {
        state_warnings(&self.state)
    }

    /// Replaces the working copy with what is currently stored.
    pub fn reload(&mut self) -> FinanceResult<()> {
        self.state = self.storage.load_state(&self.key)?;
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> FinanceResult<StateBackupInfo> {
        Ok(self.storage.backup_state(&self.key, &self.state, note)?)
    }

    pub fn list_backups(&self) -> FinanceResult<Vec<StateBackupInfo>> {
        Ok(self.storage.list_backups(&self.key)?)
    }

    pub fn restore_backup(&mut self, backup: &StateBackupInfo) -> FinanceResult<()> {
        self.state = self.storage.restore_backup(backup)?;
        for warning in state_warnings(&self.state) {
            warn!(key = %self.key, "{warning}");
        }
        Ok(())
    }

    // Income sources

    pub fn add_income(&mut self, income: IncomeSource) -> FinanceResult<Uuid> {
        let id = income.id;
        let next = IncomeService::add(&self.state, income, self.clock.as_ref())?;
        self.commit(next)?;
        Ok(id)
    }

    pub fn update_income(&mut self, id: Uuid, changes: IncomeSource) -> FinanceResult<()> {
        let next = IncomeService::update(&self.state, id, changes, self.clock.as_ref())?;
        self.commit(next)
    }

    pub fn delete_income(&mut self, id: Uuid) -> FinanceResult<()> {
        let next = IncomeService::delete(&self.state, id, self.clock.as_ref())?;
        self.commit(next)
    }

    // Expenses

    pub fn add_expense(&mut self, expense: Expense) -> FinanceResult<Uuid> {
        let id = expense.id;
        let next = ExpenseService::add(&self.state, expense, self.clock.as_ref())?;
        self.commit(next)?;
        Ok(id)
    }

    pub fn update_expense(&mut self, id: Uuid, changes: Expense) -> FinanceResult<()> {
        let next = ExpenseService::update(&self.state, id, changes, self.clock.as_ref())?;
        self.commit(next)
    }

    pub fn delete_expense(&mut self, id: Uuid) -> FinanceResult<()> {
        let next = ExpenseService::delete(&self.state, id, self.clock.as_ref())?;
        self.commit(next)
    }

    // Categories

    pub fn add_category(&mut self, category: ExpenseCategory) -> FinanceResult<Uuid> {
        let id = category.id;
        let next = CategoryService::add(&self.state, category)?;
        self.commit(next)?;
        Ok(id)
    }

    pub fn update_category(&mut self, id: Uuid, changes: ExpenseCategory) -> FinanceResult<()> {
        let next = CategoryService::update(&self.state, id, changes)?;
        self.commit(next)
    }

    pub fn delete_category(&mut self, id: Uuid) -> FinanceResult<()> {
        let next = CategoryService::delete(&self.state, id)?;
        self.commit(next)
    }

    pub fn set_category_budget(&mut self, id: Uuid, budget: f64) -> FinanceResult<()> {
        let next = CategoryService::set_budget(&self.state, id, budget)?;
        self.commit(next)
    }

    pub fn find_category(&self, name: &str) -> Option<&ExpenseCategory> {
        CategoryService::find_by_name(&self.state, name)
    }

    // Settings

    /// Switches the display currency. Stored amounts are not converted.
    pub fn set_currency(&mut self, code: &str) -> FinanceResult<()> {
        let mut next = self.state.clone();
        next.settings.currency = currency::resolve(code)?;
        next.touch();
        self.commit(next)
    }

    pub fn format_amount(&self, amount: f64) -> String {
        currency::format_amount(amount, &self.state.settings.currency)
    }

    // Reads

    pub fn get_monthly_data(&self, month: MonthKey) -> Option<&MonthlyData> {
        SummaryService::get_monthly_data(&self.state, month)
    }

    pub fn compute_month(&self, month: MonthKey) -> MonthlyData {
        SummaryService::compute_month(&self.state, month)
    }

    /// Recomputes and stores `month` outside the usual write-through path.
    pub fn refresh_month(&mut self, month: MonthKey) -> FinanceResult<MonthlyData> {
        let mut next = self.state.clone();
        let data = SummaryService::recompute_and_store(&mut next, month);
        self.commit(next)?;
        Ok(data)
    }

    pub fn projected_savings(&self, month: MonthKey) -> f64 {
        SummaryService::projected_savings(&self.state, month)
    }

    pub fn actual_savings(&self, month: MonthKey) -> f64 {
        SummaryService::actual_savings(&self.state, month)
    }

    pub fn category_spend(&self, category_id: Uuid, month: MonthKey) -> f64 {
        BudgetService::category_spend(&self.state, category_id, month)
    }

    pub fn category_remaining(&self, category_id: Uuid, month: MonthKey) -> f64 {
        BudgetService::category_remaining(&self.state, category_id, month)
    }

    pub fn total_budget(&self) -> f64 {
        BudgetService::total_budget(&self.state)
    }

    pub fn total_spent(&self, month: MonthKey) -> f64 {
        BudgetService::total_spent(&self.state, month)
    }

    pub fn budget_percentage(&self, month: MonthKey) -> f64 {
        BudgetService::budget_percentage(&self.state, month)
    }

    pub fn month_progress(&self) -> f64 {
        BudgetService::month_progress(self.clock.as_ref())
    }

    pub fn month_progress_for(&self, month: MonthKey) -> f64 {
        BudgetService::month_progress_for(month, self.clock.as_ref())
    }

    pub fn category_breakdown(&self, month: MonthKey) -> Vec<CategoryBreakdown> {
        BudgetService::category_breakdown(&self.state, month)
    }

    /// Projection anchored at the current month.
    pub fn projection(&self, range: ProjectionRange, order: ProjectionOrder) -> Vec<ProjectionEntry> {
        ForecastService::projection(&self.state, self.current_month(), range, order)
    }

    /// The last `months` months up to and including the current one.
    pub fn history(&self, months: u32, order: ProjectionOrder) -> Vec<ProjectionEntry> {
        ForecastService::history(&self.state, self.current_month(), months, order)
    }

    pub fn cumulative_savings(
        &self,
        range: ProjectionRange,
        order: ProjectionOrder,
    ) -> Vec<CumulativePoint> {
        let entries = self.projection(range, ProjectionOrder::Chronological);
        ForecastService::cumulative_savings(&entries, order)
    }

    fn commit(&mut self, next: FinanceState) -> FinanceResult<()> {
        self.storage
            .save_state(&self.key, &next)
            .map_err(FinanceError::from)?;
        self.state = next;
        Ok(())
    }
}
