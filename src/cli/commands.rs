use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use fintrack_config::{Config, ConfigManager, MAX_RANGE_MONTHS};
use fintrack_core::{
    CategoryBreakdown, Clock, FixedClock, ForecastService, FrequencyService, ProjectionEntry,
    ProjectionOrder, ProjectionRange, SystemClock,
};
use fintrack_domain::{Expense, ExpenseCategory, IncomeSource, MonthKey, MonthlyData};

use super::output::{self, OutputPreferences};
use super::{
    BackupAction, CategoryAction, Cli, CliError, CliResult, Commands, CurrencyAction,
    ExpenseAction, IncomeAction, MonthArgs, RangeArgs,
};
use crate::core::{open_json_manager, FinanceManager};
use crate::currency;
use crate::errors::FinanceError;
use crate::utils::build_info;

/// Loads configuration, opens the finance document, and runs `cli.command`.
pub fn dispatch(cli: Cli) -> CliResult<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    let base = cli.home.clone().unwrap_or_else(Config::default_home);
    let config = load_config(&cli, base.clone())?;
    if !config.ui_color_enabled {
        colored::control::set_override(false);
    }
    output::set_preferences(OutputPreferences {
        theme: config.theme,
    });

    let data_root = config.data_root.clone().unwrap_or(base);
    let clock: Box<dyn Clock> = match cli.today {
        Some(date) => Box::new(FixedClock::on(date)),
        None => Box::new(SystemClock),
    };
    debug!(root = %data_root.display(), key = %config.storage_key, "opening finance document");
    let mut manager = open_json_manager(&config, &data_root, clock)?;
    for warning in manager.warnings() {
        output::warning(warning);
    }

    let json = cli.json;
    match cli.command {
        Commands::Summary(args) => show_summary(&manager, args, json),
        Commands::Budget(args) => show_budget(&manager, args, json),
        Commands::Projection(args) => show_projection(&manager, &config, args, json),
        Commands::History(args) => show_history(&manager, &config, args, json),
        Commands::Income { action } => run_income(&mut manager, action),
        Commands::Expense { action } => run_expense(&mut manager, action),
        Commands::Category { action } => run_category(&mut manager, action),
        Commands::Currency { action } => run_currency(&mut manager, action),
        Commands::Backup { action } => run_backup(&mut manager, action),
        Commands::Version => Ok(()),
    }
}

fn load_config(cli: &Cli, base: PathBuf) -> CliResult<Config> {
    let manager = ConfigManager::with_base_dir(base).map_err(FinanceError::from)?;
    let mut config = manager.load().map_err(FinanceError::from)?;
    if let Some(key) = &cli.key {
        config.storage_key = key.clone();
    }
    Ok(config)
}

fn print_version() {
    let meta = build_info::current();
    println!("{}", meta.headline());
    println!("built {} for {} ({})", meta.timestamp, meta.target, meta.profile);
    println!("{}", meta.rustc);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport<'a> {
    #[serde(flatten)]
    data: &'a MonthlyData,
    month_progress: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetReport<'a> {
    month: MonthKey,
    categories: &'a [CategoryBreakdown],
    total_budget: f64,
    total_spent: f64,
    percent_used: f64,
    month_progress: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionRow<'a> {
    #[serde(flatten)]
    entry: &'a ProjectionEntry,
    cumulative_savings: f64,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(FinanceError::from)?;
    println!("{text}");
    Ok(())
}

fn show_summary(manager: &FinanceManager, args: MonthArgs, json: bool) -> CliResult<()> {
    let month = args.month.unwrap_or_else(|| manager.current_month());
    let data = manager.compute_month(month);
    if json {
        return print_json(&SummaryReport {
            data: &data,
            month_progress: manager.month_progress_for(month),
        });
    }
    let money = |amount: f64| manager.format_amount(amount);

    output::section(format!("Summary {month}"));
    let mut rows = vec![vec![String::new(), "Projected".into(), "Actual".into()]];
    rows.push(vec![
        "Income".into(),
        money(data.projected_income()),
        money(data.actual_income()),
    ]);
    rows.push(vec![
        "Expenses".into(),
        money(data.projected_expenses()),
        money(data.actual_expenses()),
    ]);
    rows.push(vec![
        "Savings".into(),
        money(data.projected_savings()),
        money(data.actual_savings()),
    ]);
    print!("{}", output::table(&rows));

    let progress = manager.month_progress_for(month);
    output::info(format!(
        "Month progress {} {:.0}%",
        output::progress_bar(progress, 20),
        progress
    ));
    Ok(())
}

fn show_budget(manager: &FinanceManager, args: MonthArgs, json: bool) -> CliResult<()> {
    let month = args.month.unwrap_or_else(|| manager.current_month());
    let breakdown = manager.category_breakdown(month);
    if json {
        return print_json(&BudgetReport {
            month,
            categories: &breakdown,
            total_budget: manager.total_budget(),
            total_spent: manager.total_spent(month),
            percent_used: manager.budget_percentage(month),
            month_progress: manager.month_progress_for(month),
        });
    }
    let money = |amount: f64| manager.format_amount(amount);

    output::section(format!("Budget {month}"));
    if breakdown.is_empty() {
        output::info("No categories defined.");
        return Ok(());
    }
    let mut rows = vec![vec![
        "Category".to_string(),
        "Budget".into(),
        "Spent".into(),
        "Remaining".into(),
        "Used".into(),
        "Status".into(),
    ]];
    for row in &breakdown {
        rows.push(vec![
            row.name.clone(),
            money(row.budget),
            money(row.spent),
            money(row.remaining),
            format!("{:.1}%", row.percent_used),
            output::status_badge(row.status),
        ]);
    }
    print!("{}", output::table(&rows));

    output::info(format!(
        "Total: {} of {} ({:.1}%)",
        money(manager.total_spent(month)),
        money(manager.total_budget()),
        manager.budget_percentage(month)
    ));
    let progress = manager.month_progress_for(month);
    output::info(format!(
        "Month progress {} {:.0}%",
        output::progress_bar(progress, 20),
        progress
    ));
    Ok(())
}

fn show_projection(
    manager: &FinanceManager,
    config: &Config,
    args: RangeArgs,
    json: bool,
) -> CliResult<()> {
    let months = range_months(args.months, config.projection_months)?;
    let order = order_for(args.reverse);
    let entries = manager.projection(ProjectionRange::Forward(months), order);
    let cumulative = ForecastService::cumulative_savings(&entries, order);
    if json {
        let rows: Vec<ProjectionRow<'_>> = entries
            .iter()
            .zip(&cumulative)
            .map(|(entry, point)| ProjectionRow {
                entry,
                cumulative_savings: point.cumulative,
            })
            .collect();
        return print_json(&rows);
    }
    let money = |amount: f64| manager.format_amount(amount);

    output::section(format!("Projection ({months} months)"));
    let mut rows = vec![vec![
        "Month".to_string(),
        "Income".into(),
        "Expenses".into(),
        "Savings".into(),
        "Cumulative".into(),
    ]];
    for (entry, point) in entries.iter().zip(&cumulative) {
        rows.push(vec![
            entry.month().to_string(),
            money(entry.data.projected_income()),
            money(entry.data.projected_expenses()),
            money(entry.data.projected_savings()),
            money(point.cumulative),
        ]);
    }
    print!("{}", output::table(&rows));
    Ok(())
}

fn show_history(
    manager: &FinanceManager,
    config: &Config,
    args: RangeArgs,
    json: bool,
) -> CliResult<()> {
    let months = range_months(args.months, config.history_months)?;
    let entries = manager.history(months, order_for(args.reverse));
    if json {
        return print_json(&entries);
    }
    let money = |amount: f64| manager.format_amount(amount);

    output::section(format!("History ({months} months)"));
    let mut rows = vec![vec![
        "Month".to_string(),
        "Income".into(),
        "Expenses".into(),
        "Savings".into(),
        "Source".into(),
    ]];
    for entry in &entries {
        rows.push(vec![
            entry.month().to_string(),
            money(entry.data.actual_income()),
            money(entry.data.actual_expenses()),
            money(entry.data.actual_savings()),
            format!("{:?}", entry.source).to_lowercase(),
        ]);
    }
    print!("{}", output::table(&rows));
    Ok(())
}

fn run_income(manager: &mut FinanceManager, action: IncomeAction) -> CliResult<()> {
    match action {
        IncomeAction::Add {
            name,
            amount,
            frequency,
            date,
            start,
        } => {
            let mut income = IncomeSource::new(name, amount, frequency);
            income.date = date;
            income.start_date = start;
            let label = income.name.clone();
            let id = manager.add_income(income)?;
            output::success(format!("Added income `{label}` ({})", short_id(id)));
        }
        IncomeAction::List => {
            let incomes = &manager.state().income_sources;
            if incomes.is_empty() {
                output::info("No income sources.");
                return Ok(());
            }
            let mut rows = vec![vec![
                "Id".to_string(),
                "Name".into(),
                "Amount".into(),
                "Frequency".into(),
                "Monthly".into(),
                "Schedule".into(),
            ]];
            for income in incomes {
                rows.push(vec![
                    short_id(income.id),
                    income.name.clone(),
                    manager.format_amount(income.amount),
                    income.frequency.to_string(),
                    manager.format_amount(FrequencyService::record_monthly_equivalent(income)),
                    schedule_label(income.date.as_deref(), income.start_date.as_deref(), None),
                ]);
            }
            print!("{}", output::table(&rows));
        }
        IncomeAction::Delete { id } => {
            let candidates = manager
                .state()
                .income_sources
                .iter()
                .map(|income| income.id);
            let id = resolve_id("income source", candidates, &id)?;
            manager.delete_income(id)?;
            output::success(format!("Deleted income {}", short_id(id)));
        }
    }
    Ok(())
}

fn run_expense(manager: &mut FinanceManager, action: ExpenseAction) -> CliResult<()> {
    match action {
        ExpenseAction::Add {
            name,
            amount,
            category,
            frequency,
            date,
            start,
            in_month,
        } => {
            let category_id = resolve_category(manager, &category)?;
            let mut expense = Expense::new(name, amount, category_id, frequency);
            expense.date = date;
            expense.start_date = start;
            expense.month = in_month;
            let label = expense.name.clone();
            let id = manager.add_expense(expense)?;
            output::success(format!("Added expense `{label}` ({})", short_id(id)));
        }
        ExpenseAction::List => {
            let state = manager.state();
            if state.expenses.is_empty() {
                output::info("No expenses.");
                return Ok(());
            }
            let mut rows = vec![vec![
                "Id".to_string(),
                "Name".into(),
                "Category".into(),
                "Amount".into(),
                "Frequency".into(),
                "Monthly".into(),
                "Schedule".into(),
            ]];
            for expense in &state.expenses {
                rows.push(vec![
                    short_id(expense.id),
                    expense.name.clone(),
                    state.category_label(expense.category_id).to_string(),
                    manager.format_amount(expense.amount),
                    expense.frequency.to_string(),
                    manager.format_amount(FrequencyService::record_monthly_equivalent(expense)),
                    schedule_label(
                        expense.date.as_deref(),
                        expense.start_date.as_deref(),
                        expense.month.as_deref(),
                    ),
                ]);
            }
            print!("{}", output::table(&rows));
        }
        ExpenseAction::Delete { id } => {
            let candidates = manager.state().expenses.iter().map(|expense| expense.id);
            let id = resolve_id("expense", candidates, &id)?;
            manager.delete_expense(id)?;
            output::success(format!("Deleted expense {}", short_id(id)));
        }
    }
    Ok(())
}

fn run_category(manager: &mut FinanceManager, action: CategoryAction) -> CliResult<()> {
    match action {
        CategoryAction::Add {
            name,
            color,
            budget,
            period,
        } => {
            let category = ExpenseCategory::new(name, color).with_budget(budget, period);
            let label = category.name.clone();
            manager.add_category(category)?;
            output::success(format!("Added category `{label}`"));
        }
        CategoryAction::List => {
            let mut rows = vec![vec![
                "Name".to_string(),
                "Color".into(),
                "Budget".into(),
                "Period".into(),
            ]];
            for category in &manager.state().expense_categories {
                let budget = if category.has_budget() {
                    manager.format_amount(category.budget)
                } else {
                    "-".into()
                };
                rows.push(vec![
                    category.name.clone(),
                    category.color.clone(),
                    budget,
                    category.periodicity.to_string(),
                ]);
            }
            print!("{}", output::table(&rows));
        }
        CategoryAction::Delete { category } => {
            let id = resolve_category(manager, &category)?;
            let label = manager.state().category_label(id).to_string();
            manager.delete_category(id)?;
            output::success(format!("Deleted category `{label}`"));
        }
        CategoryAction::Budget { category, amount } => {
            let id = resolve_category(manager, &category)?;
            manager.set_category_budget(id, amount)?;
            let label = manager.state().category_label(id).to_string();
            output::success(format!(
                "Budget for `{label}` set to {}",
                manager.format_amount(amount)
            ));
        }
    }
    Ok(())
}

fn run_currency(manager: &mut FinanceManager, action: CurrencyAction) -> CliResult<()> {
    match action {
        CurrencyAction::Show => {
            let currency = &manager.settings().currency;
            output::info(format!(
                "{} ({}) {}",
                currency.code, currency.symbol, currency.name
            ));
        }
        CurrencyAction::List => {
            let active = manager.settings().currency.code.clone();
            let mut rows = vec![vec![
                "Code".to_string(),
                "Symbol".into(),
                "Name".into(),
                String::new(),
            ]];
            for currency in currency::catalog() {
                let marker = if currency.code == active { "*" } else { "" };
                rows.push(vec![
                    currency.code.clone(),
                    currency.symbol.clone(),
                    currency.name.clone(),
                    marker.into(),
                ]);
            }
            print!("{}", output::table(&rows));
        }
        CurrencyAction::Set { code } => {
            manager.set_currency(&code)?;
            let currency = &manager.settings().currency;
            output::success(format!("Display currency set to {}", currency.code));
        }
    }
    Ok(())
}

fn run_backup(manager: &mut FinanceManager, action: BackupAction) -> CliResult<()> {
    match action {
        BackupAction::Create { note } => {
            let backup = manager.backup(note.as_deref())?;
            output::success(format!("Backup written: {}", backup.id));
        }
        BackupAction::List => {
            let backups = manager.list_backups()?;
            if backups.is_empty() {
                output::info("No backups.");
                return Ok(());
            }
            let mut rows = vec![vec!["Backup".to_string(), "Created".into()]];
            for backup in backups {
                rows.push(vec![backup.id, backup.created_at]);
            }
            print!("{}", output::table(&rows));
        }
        BackupAction::Restore { id } => {
            let backup = manager
                .list_backups()?
                .into_iter()
                .find(|backup| backup.id == id)
                .ok_or_else(|| CliError::Usage(format!("no backup named `{id}`")))?;
            manager.restore_backup(&backup)?;
            output::success(format!("Restored {}", backup.id));
        }
    }
    Ok(())
}

fn range_months(requested: Option<u32>, configured: u32) -> CliResult<u32> {
    match requested {
        Some(months) if months == 0 || months > MAX_RANGE_MONTHS => Err(CliError::Usage(format!(
            "--months must be between 1 and {MAX_RANGE_MONTHS} (got {months})"
        ))),
        Some(months) => Ok(months),
        None => Ok(configured),
    }
}

fn order_for(reverse: bool) -> ProjectionOrder {
    if reverse {
        ProjectionOrder::ReverseChronological
    } else {
        ProjectionOrder::Chronological
    }
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

fn schedule_label(date: Option<&str>, start: Option<&str>, pinned: Option<&str>) -> String {
    if let Some(month) = pinned {
        return format!("only {month}");
    }
    if let Some(date) = date {
        return format!("on {date}");
    }
    match start {
        Some(start) => format!("from {start}"),
        None => "always".into(),
    }
}

/// Accepts a full id, or a prefix of its hyphen-less form that matches exactly one record.
fn resolve_id(
    kind: &str,
    candidates: impl Iterator<Item = Uuid>,
    raw: &str,
) -> CliResult<Uuid> {
    if let Ok(id) = Uuid::parse_str(raw.trim()) {
        return Ok(id);
    }
    let prefix = raw.trim().replace('-', "").to_ascii_lowercase();
    if prefix.is_empty() {
        return Err(CliError::Usage(format!("{kind} id cannot be empty")));
    }
    let matches: Vec<Uuid> = candidates
        .filter(|id| id.simple().to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CliError::Usage(format!("no {kind} matches id `{raw}`"))),
        _ => Err(CliError::Usage(format!(
            "id `{raw}` matches {} records; use more characters",
            matches.len()
        ))),
    }
}

fn resolve_category(manager: &FinanceManager, raw: &str) -> CliResult<Uuid> {
    if let Some(category) = manager.find_category(raw) {
        return Ok(category.id);
    }
    let candidates = manager
        .state()
        .expense_categories
        .iter()
        .map(|category| category.id);
    resolve_id("category", candidates, raw)
}
