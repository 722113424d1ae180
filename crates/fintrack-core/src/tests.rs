use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    budget_service::{BudgetService, BudgetStatus},
    category_service::CategoryService,
    expense_service::ExpenseService,
    forecast_service::{ForecastService, ProjectionOrder, ProjectionRange},
    income_service::IncomeService,
    storage::state_warnings,
    summary_service::SummaryService,
    time::FixedClock,
    CoreError,
};
use fintrack_domain::{
    common::Identifiable, BudgetPeriod, Expense, ExpenseCategory, FinanceState, Frequency,
    IncomeSource, MonthKey,
};

fn clock() -> FixedClock {
    FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
}

fn june() -> MonthKey {
    MonthKey::parse("2024-06").unwrap()
}

fn close(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-6
}

#[test]
fn salary_rent_and_groceries_scenario() {
    let clock = clock();
    let state = FinanceState::with_default_categories();
    let housing = state.expense_categories[0].id();
    let food = state.expense_categories[2].id();

    let state = IncomeService::add(
        &state,
        IncomeSource::new("Salary", 3000.0, Frequency::Monthly),
        &clock,
    )
    .expect("add salary");
    let state = ExpenseService::add(
        &state,
        Expense::new("Rent", 1000.0, housing, Frequency::Monthly),
        &clock,
    )
    .expect("add rent");
    let state = ExpenseService::add(
        &state,
        Expense::new("Groceries", 200.0, food, Frequency::Weekly),
        &clock,
    )
    .expect("add groceries");

    let data = state.monthly_data_for(june()).expect("current month recorded");
    assert_eq!(data.projected_income(), 3000.0);
    assert!(close(data.projected_expenses(), 1866.0));
    assert!(close(data.projected_savings(), 1134.0));
    assert!(close(data.actual_savings(), 1134.0));
    assert_eq!(state.monthly_data.len(), 1);
}

#[test]
fn mutations_leave_the_input_state_untouched() {
    let clock = clock();
    let original = FinanceState::with_default_categories();
    let updated = IncomeService::add(
        &original,
        IncomeSource::new("Salary", 3000.0, Frequency::Monthly),
        &clock,
    )
    .expect("add income");
    assert!(original.income_sources.is_empty());
    assert!(original.monthly_data.is_empty());
    assert_eq!(updated.income_sources.len(), 1);
}

#[test]
fn income_update_and_delete_recompute_current_month() {
    let clock = clock();
    let salary = IncomeSource::new("Salary", 3000.0, Frequency::Monthly);
    let id = salary.id;
    let state = IncomeService::add(&FinanceState::new(), salary, &clock).expect("add");

    let mut changes = IncomeSource::new("Salary", 3200.0, Frequency::Monthly);
    changes.start_date = Some("2024-01".into());
    let state = IncomeService::update(&state, id, changes, &clock).expect("update");
    assert_eq!(state.income(id).unwrap().amount, 3200.0);
    assert_eq!(state.income(id).unwrap().id, id);
    assert_eq!(
        SummaryService::get_monthly_data(&state, june())
            .unwrap()
            .projected_income(),
        3200.0
    );

    let state = IncomeService::delete(&state, id, &clock).expect("delete");
    assert_eq!(state.monthly_data.len(), 1);
    assert_eq!(
        SummaryService::get_monthly_data(&state, june())
            .unwrap()
            .projected_income(),
        0.0
    );
}

#[test]
fn expense_update_and_delete_recompute_current_month() {
    let clock = clock();
    let state = FinanceState::with_default_categories();
    let housing = state.expense_categories[0].id();
    let food = state.expense_categories[2].id();
    let rent = Expense::new("Rent", 1000.0, housing, Frequency::Monthly);
    let rent_id = rent.id;
    let groceries = Expense::new("Groceries", 200.0, food, Frequency::Weekly);
    let groceries_id = groceries.id;
    let state = ExpenseService::add(&state, rent, &clock).expect("add rent");
    let state = ExpenseService::add(&state, groceries, &clock).expect("add groceries");
    assert!(close(
        state.monthly_data_for(june()).unwrap().projected_expenses(),
        1866.0
    ));

    let changes = Expense::new("Rent", 1200.0, housing, Frequency::Monthly);
    let state = ExpenseService::update(&state, rent_id, changes, &clock).expect("update");
    let data = state.monthly_data_for(june()).unwrap();
    assert!(close(data.projected_expenses(), 2066.0));
    assert!(close(data.projected_savings(), -2066.0));

    let state = ExpenseService::delete(&state, groceries_id, &clock).expect("delete");
    assert_eq!(state.monthly_data.len(), 1);
    let data = state.monthly_data_for(june()).unwrap();
    assert!(close(data.projected_expenses(), 1200.0));
    assert!(close(data.actual_savings(), -1200.0));
}

#[test]
fn unknown_ids_are_reported() {
    let clock = clock();
    let state = FinanceState::with_default_categories();
    let missing = Uuid::new_v4();

    let err = IncomeService::delete(&state, missing, &clock).expect_err("missing income");
    assert!(matches!(err, CoreError::IncomeNotFound(id) if id == missing));
    assert!(err.is_not_found());

    let err = ExpenseService::update(
        &state,
        missing,
        Expense::new("Rent", 1.0, Uuid::new_v4(), Frequency::Monthly),
        &clock,
    )
    .expect_err("missing expense");
    assert!(matches!(err, CoreError::ExpenseNotFound(_)));

    let err = CategoryService::set_budget(&state, missing, 10.0).expect_err("missing category");
    assert!(matches!(err, CoreError::CategoryNotFound(_)));
}

#[test]
fn invalid_records_are_rejected() {
    let clock = clock();
    let state = FinanceState::new();

    let err = IncomeService::add(
        &state,
        IncomeSource::new("  ", 100.0, Frequency::Monthly),
        &clock,
    )
    .expect_err("blank name");
    assert!(matches!(err, CoreError::Validation(_)));

    let err = IncomeService::add(
        &state,
        IncomeSource::new("Tips", 10.0, Frequency::Daily),
        &clock,
    )
    .expect_err("daily income");
    assert!(err.to_string().contains("daily"));

    let err = ExpenseService::add(
        &state,
        Expense::new("Refund", -5.0, Uuid::new_v4(), Frequency::Monthly),
        &clock,
    )
    .expect_err("negative amount");
    assert!(matches!(err, CoreError::Validation(_)));

    let err = ExpenseService::add(
        &state,
        Expense::new("Quarterly", 5.0, Uuid::new_v4(), Frequency::parse("quarterly")),
        &clock,
    )
    .expect_err("unknown frequency");
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn daily_expenses_are_accepted() {
    let clock = clock();
    let state = ExpenseService::add(
        &FinanceState::new(),
        Expense::new("Coffee", 4.0, Uuid::new_v4(), Frequency::Daily),
        &clock,
    )
    .expect("daily expense");
    assert_eq!(
        state.monthly_data_for(june()).unwrap().projected_expenses(),
        120.0
    );
}

#[test]
fn category_deletion_is_guarded() {
    let clock = clock();
    let state = FinanceState::with_default_categories();
    let food = state.expense_categories[2].id();
    let state = ExpenseService::add(
        &state,
        Expense::new("Groceries", 50.0, food, Frequency::Weekly),
        &clock,
    )
    .expect("add expense");

    let err = CategoryService::delete(&state, food).expect_err("category in use");
    assert!(matches!(err, CoreError::CategoryInUse { id, expenses: 1 } if id == food));
    assert!(state.category(food).is_some());

    let expense_id = state.expenses[0].id;
    let state = ExpenseService::delete(&state, expense_id, &clock).expect("delete expense");
    let state = CategoryService::delete(&state, food).expect("delete category");
    assert!(state.category(food).is_none());
    assert_eq!(state.expense_categories.len(), 7);
}

#[test]
fn category_changes_do_not_recompute_monthly_data() {
    let state = FinanceState::new();
    let state = CategoryService::add(
        &state,
        ExpenseCategory::new("Travel", "#123456").with_budget(250.0, BudgetPeriod::Yearly),
    )
    .expect("add category");
    assert!(state.monthly_data.is_empty());
    let id = state.expense_categories[0].id();
    let state = CategoryService::set_budget(&state, id, 300.0).expect("set budget");
    assert_eq!(state.category(id).unwrap().budget, 300.0);
    assert!(state.monthly_data.is_empty());
}

#[test]
fn duplicate_category_names_are_rejected() {
    let state = FinanceState::with_default_categories();
    let err = CategoryService::add(&state, ExpenseCategory::new(" food ", "#000000"))
        .expect_err("duplicate");
    assert!(err.to_string().contains("already exists"));

    let food = state.expense_categories[2].id();
    let mut renamed = ExpenseCategory::new("FOOD", "#000000");
    renamed.budget = 650.0;
    let state = CategoryService::update(&state, food, renamed).expect("rename to own name");
    assert_eq!(state.category(food).unwrap().name, "FOOD");
    assert_eq!(state.category(food).unwrap().budget, 650.0);

    let err = CategoryService::update(&state, food, ExpenseCategory::new("Housing", "#000000"))
        .expect_err("collides with another category");
    assert!(matches!(err, CoreError::Validation(_)));
    assert!(CategoryService::find_by_name(&state, "housing").is_some());
}

#[test]
fn budget_over_at_exact_spend() {
    let clock = clock();
    let mut state = FinanceState::new();
    let category = ExpenseCategory::new("Food", "#3357FF").with_budget(500.0, BudgetPeriod::Monthly);
    let id = category.id;
    state.expense_categories.push(category);
    let state = ExpenseService::add(
        &state,
        Expense::new("Groceries", 500.0, id, Frequency::Monthly),
        &clock,
    )
    .expect("add expense");

    assert_eq!(BudgetService::category_remaining(&state, id, june()), 0.0);
    assert_eq!(BudgetService::budget_percentage(&state, june()), 100.0);
    let rows = BudgetService::category_breakdown(&state, june());
    assert_eq!(rows[0].status, BudgetStatus::Over);
}

#[test]
fn projection_and_history_share_the_cache() {
    let clock = clock();
    let state = IncomeService::add(
        &FinanceState::new(),
        IncomeSource::new("Salary", 3000.0, Frequency::Monthly),
        &clock,
    )
    .expect("add salary");
    let state = IncomeService::add(
        &state,
        IncomeSource::one_time("Bonus", 500.0, "2024-06-20"),
        &clock,
    )
    .expect("add bonus");

    let forward = ForecastService::projection(
        &state,
        june(),
        ProjectionRange::Forward(12),
        ProjectionOrder::Chronological,
    );
    assert_eq!(forward[0].data.projected_income(), 3500.0);
    assert!(forward[1..]
        .iter()
        .all(|entry| entry.data.projected_income() == 3000.0));

    let history = ForecastService::history(&state, june(), 12, ProjectionOrder::ReverseChronological);
    assert_eq!(history[0].month(), june());
    assert_eq!(history[0].data.actual_income(), 3500.0);
    assert!(history[1..]
        .iter()
        .all(|entry| entry.data.actual_income() == 0.0));
}

#[test]
fn warnings_flag_dangling_and_malformed_records() {
    let mut state = FinanceState::with_default_categories();
    state
        .expenses
        .push(Expense::new("Orphan", 10.0, Uuid::new_v4(), Frequency::Monthly));
    state
        .income_sources
        .push(IncomeSource::new("Odd", 10.0, Frequency::parse("quarterly")).starting("soon"));
    state
        .income_sources
        .push(IncomeSource::one_time("Gift", 10.0, "someday"));

    let warnings = state_warnings(&state);
    assert_eq!(warnings.len(), 4, "{warnings:?}");
    assert!(warnings.iter().any(|w| w.contains("missing category")));
    assert!(warnings.iter().any(|w| w.contains("unrecognized frequency `quarterly`")));
    assert!(warnings.iter().any(|w| w.contains("malformed start month")));
    assert!(warnings.iter().any(|w| w.contains("malformed date `someday`")));
}
