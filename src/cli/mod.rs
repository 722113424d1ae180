//! Command-line interface: argument definitions and dispatch.
//!
//! The command implementations live in [`commands`].

pub mod commands;
pub mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use fintrack_domain::{BudgetPeriod, Frequency, MonthKey};

use crate::errors::FinanceError;

/// fintrack - recurring income and expense projections
#[derive(Debug, Parser)]
#[command(name = "fintrack")]
#[command(about = "Track recurring income and expenses and project monthly savings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base directory for configuration and data (defaults to $FINTRACK_HOME or ~/.fintrack)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Storage key of the finance document (defaults to the configured key)
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print reports (summary, budget, projection, history) as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Income, expenses, and savings for a month
    Summary(MonthArgs),

    /// Per-category budget usage for a month
    Budget(MonthArgs),

    /// Month-by-month projection starting at the current month
    Projection(RangeArgs),

    /// Recorded figures for past months, ending at the current month
    History(RangeArgs),

    /// Manage income sources
    Income {
        #[command(subcommand)]
        action: IncomeAction,
    },

    /// Manage expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Manage expense categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Show or change the display currency
    Currency {
        #[command(subcommand)]
        action: CurrencyAction,
    },

    /// Manage backups of the finance document
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Print build information
    Version,
}

#[derive(Debug, Args)]
pub struct MonthArgs {
    /// Month to report (YYYY-MM); defaults to the current month
    #[arg(long, value_parser = parse_month)]
    pub month: Option<MonthKey>,
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Number of months to show (defaults to the configured range)
    #[arg(long)]
    pub months: Option<u32>,

    /// Newest month first
    #[arg(long)]
    pub reverse: bool,
}

#[derive(Debug, Subcommand)]
pub enum IncomeAction {
    /// Add an income source
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        amount: f64,
        /// weekly, biweekly, monthly, yearly, or one-time
        #[arg(long, default_value = "monthly", value_parser = parse_frequency)]
        frequency: Frequency,
        /// Occurrence date of a one-time income (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// First month a recurring income counts (YYYY-MM)
        #[arg(long)]
        start: Option<String>,
    },
    /// List income sources
    List,
    /// Delete an income source by id (or unique id prefix)
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ExpenseAction {
    /// Add an expense
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        amount: f64,
        /// Category name or id
        #[arg(long)]
        category: String,
        /// daily, weekly, biweekly, monthly, yearly, or one-time
        #[arg(long, default_value = "monthly", value_parser = parse_frequency)]
        frequency: Frequency,
        /// Occurrence date of a one-time expense (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// First month a recurring expense counts (YYYY-MM)
        #[arg(long)]
        start: Option<String>,
        /// Count the expense in this month only (YYYY-MM)
        #[arg(long = "in-month")]
        in_month: Option<String>,
    },
    /// List expenses
    List,
    /// Delete an expense by id (or unique id prefix)
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// Add a category
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "#808080")]
        color: String,
        #[arg(long, default_value_t = 0.0)]
        budget: f64,
        /// daily, weekly, biweekly, monthly, or yearly
        #[arg(long, default_value = "monthly")]
        period: BudgetPeriod,
    },
    /// List categories
    List,
    /// Delete a category by name or id
    Delete { category: String },
    /// Set a category's budget
    Budget { category: String, amount: f64 },
}

#[derive(Debug, Subcommand)]
pub enum CurrencyAction {
    /// Show the display currency
    Show,
    /// List supported currencies
    List,
    /// Change the display currency
    Set { code: String },
}

#[derive(Debug, Subcommand)]
pub enum BackupAction {
    /// Write a backup of the current document
    Create {
        #[arg(long)]
        note: Option<String>,
    },
    /// List backups, newest first
    List,
    /// Restore a backup by file name
    Restore { id: String },
}

/// Errors reported by the CLI binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error("{0}")]
    Usage(String),
}

pub type CliResult<T> = Result<T, CliError>;

/// Parses the process arguments and runs the selected command.
pub fn run_cli() -> CliResult<()> {
    commands::dispatch(Cli::parse())
}

fn parse_month(raw: &str) -> Result<MonthKey, String> {
    MonthKey::parse(raw).map_err(|err| err.to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn parse_frequency(raw: &str) -> Result<Frequency, String> {
    let frequency = Frequency::parse(raw);
    if frequency.is_recognized() {
        Ok(frequency)
    } else {
        Err(format!(
            "unknown frequency `{raw}` (expected daily, weekly, biweekly, monthly, yearly, or one-time)"
        ))
    }
}
