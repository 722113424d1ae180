mod common;

use common::{assert_close, june_10, open_at, setup_manager, temp_root};
use fintrack::{
    config::Config,
    domain::{Expense, ExpenseCategory, Frequency, IncomeSource, MonthKey},
    engine::{
        BudgetStatus, CoreError, EntrySource, FixedClock, ProjectionOrder, ProjectionRange,
    },
    open_json_manager, FinanceError,
};

fn june() -> MonthKey {
    MonthKey::parse("2024-06").unwrap()
}

fn seed(manager: &mut fintrack::FinanceManager) {
    let housing = manager.find_category("Housing").unwrap().id;
    let food = manager.find_category("food").unwrap().id;
    manager
        .add_income(IncomeSource::new("Salary", 3000.0, Frequency::Monthly))
        .unwrap();
    manager
        .add_expense(Expense::new("Rent", 1000.0, housing, Frequency::Monthly))
        .unwrap();
    manager
        .add_expense(Expense::new("Groceries", 200.0, food, Frequency::Weekly))
        .unwrap();
}

#[test]
fn fresh_document_has_default_categories_and_is_not_written() {
    let (manager, _root) = setup_manager();
    assert_eq!(manager.state().expense_categories.len(), 8);
    assert!(manager.state().income_sources.is_empty());
    assert!(!manager.storage().state_exists(manager.key()));
    assert_eq!(manager.current_month(), june());
}

#[test]
fn changes_are_persisted_and_cached_for_the_current_month() {
    let (mut manager, root) = setup_manager();
    seed(&mut manager);

    let cached = manager.get_monthly_data(june()).expect("june is cached");
    assert_close(cached.projected_income(), 3000.0);
    assert_close(cached.projected_expenses(), 1866.0);
    assert_close(manager.projected_savings(june()), 1134.0);

    let reopened = open_at(&root, june_10());
    assert_eq!(reopened.state(), manager.state());
    assert_close(reopened.projected_savings(june()), 1134.0);
}

#[test]
fn rejected_change_leaves_state_and_disk_untouched() {
    let (mut manager, _root) = setup_manager();
    let before = manager.state().clone();

    let err = manager
        .add_income(IncomeSource::new("Refund", -10.0, Frequency::Monthly))
        .unwrap_err();
    assert!(matches!(err, FinanceError::Core(CoreError::Validation(_))));
    assert_eq!(manager.state(), &before);
    assert!(!manager.storage().state_exists(manager.key()));
}

#[test]
fn category_in_use_cannot_be_deleted() {
    let (mut manager, _root) = setup_manager();
    seed(&mut manager);
    let housing = manager.find_category("Housing").unwrap().id;

    let err = manager.delete_category(housing).unwrap_err();
    assert!(matches!(
        err,
        FinanceError::Core(CoreError::CategoryInUse { expenses: 1, .. })
    ));

    let unused = manager.find_category("Entertainment").unwrap().id;
    manager.delete_category(unused).unwrap();
    assert!(manager.find_category("Entertainment").is_none());
}

#[test]
fn unknown_ids_report_not_found() {
    let (mut manager, _root) = setup_manager();
    let err = manager.delete_expense(uuid::Uuid::new_v4()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn budget_breakdown_flags_exhausted_category() {
    let (mut manager, _root) = setup_manager();
    seed(&mut manager);
    let housing = manager.find_category("Housing").unwrap().id;
    manager.set_category_budget(housing, 1000.0).unwrap();

    let row = manager
        .category_breakdown(june())
        .into_iter()
        .find(|row| row.category_id == housing)
        .unwrap();
    assert_eq!(row.status, BudgetStatus::Over);
    assert_close(row.remaining, 0.0);
    assert_close(manager.total_budget(), 2750.0);
}

#[test]
fn projection_starts_from_cache_and_accumulates() {
    let (mut manager, _root) = setup_manager();
    seed(&mut manager);

    let entries = manager.projection(ProjectionRange::Forward(3), ProjectionOrder::Chronological);
    let sources: Vec<EntrySource> = entries.iter().map(|entry| entry.source).collect();
    assert_eq!(
        sources,
        vec![
            EntrySource::Recorded,
            EntrySource::Synthesized,
            EntrySource::Synthesized
        ]
    );

    let points = manager.cumulative_savings(
        ProjectionRange::Forward(3),
        ProjectionOrder::ReverseChronological,
    );
    assert_eq!(points[0].month, MonthKey::parse("2024-08").unwrap());
    assert_close(points[0].cumulative, 3402.0);
    assert_close(points[2].cumulative, 1134.0);
}

#[test]
fn history_zero_fills_unrecorded_months() {
    let (mut manager, _root) = setup_manager();
    seed(&mut manager);

    let entries = manager.history(3, ProjectionOrder::Chronological);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].source, EntrySource::Empty);
    assert_eq!(entries[0].data.actual_savings(), 0.0);
    assert_eq!(entries[2].source, EntrySource::Recorded);
}

#[test]
fn currency_switch_changes_symbol_only() {
    let (mut manager, _root) = setup_manager();
    manager.set_currency("eur").unwrap();
    assert_eq!(manager.settings().currency.code, "EUR");
    assert_eq!(manager.format_amount(12.5), "€12.50");

    let err = manager.set_currency("XYZ").unwrap_err();
    assert!(matches!(err, FinanceError::UnknownCurrency(code) if code == "XYZ"));
    assert_eq!(manager.settings().currency.code, "EUR");
}

#[test]
fn configured_currency_seeds_a_fresh_document() {
    let root = temp_root();
    let config = Config {
        currency: "GBP".into(),
        ..Config::default()
    };
    let manager = open_json_manager(&config, &root, Box::new(FixedClock::on(june_10()))).unwrap();
    assert_eq!(manager.format_amount(5.0), "£5.00");
}

#[test]
fn backup_and_restore_round_trip() {
    let (mut manager, _root) = setup_manager();
    manager
        .add_income(IncomeSource::new("Salary", 3000.0, Frequency::Monthly))
        .unwrap();
    let checkpoint = manager.backup(Some("checkpoint")).unwrap();
    assert!(checkpoint.id.contains("checkpoint"));

    manager
        .add_income(IncomeSource::new("Bonus", 500.0, Frequency::Yearly))
        .unwrap();
    assert_eq!(manager.state().income_sources.len(), 2);

    let backups = manager.list_backups().unwrap();
    let chosen = backups
        .iter()
        .find(|backup| backup.id == checkpoint.id)
        .cloned()
        .unwrap();
    manager.restore_backup(&chosen).unwrap();
    assert_eq!(manager.state().income_sources.len(), 1);

    manager.reload().unwrap();
    assert_eq!(manager.state().income_sources.len(), 1);
}

#[test]
fn category_rename_keeps_expense_links() {
    let (mut manager, _root) = setup_manager();
    seed(&mut manager);
    let food = manager.find_category("Food").unwrap().clone();

    let renamed = ExpenseCategory {
        name: "Groceries & Dining".into(),
        ..food.clone()
    };
    manager.update_category(food.id, renamed).unwrap();

    assert!(manager.find_category("Food").is_none());
    assert_close(manager.category_spend(food.id, june()), 866.0);
}
