use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use fintrack_domain::{FinanceState, MonthKey, Scheduled};

use crate::CoreError;

/// Describes a persisted backup of one finance document.
#[derive(Debug, Clone)]
pub struct StateBackupInfo {
    pub key: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Persistence backend for finance documents, addressed by storage key.
pub trait FinanceStorage: Send + Sync {
    fn save_state(&self, key: &str, state: &FinanceState) -> Result<(), CoreError>;
    fn load_state(&self, key: &str) -> Result<FinanceState, CoreError>;
    fn state_exists(&self, key: &str) -> bool;
    fn list_keys(&self) -> Result<Vec<String>, CoreError>;
    fn delete_state(&self, key: &str) -> Result<(), CoreError>;
    fn save_state_to_path(&self, state: &FinanceState, path: &Path) -> Result<(), CoreError>;
    fn load_state_from_path(&self, path: &Path) -> Result<FinanceState, CoreError>;
    fn backup_state(
        &self,
        key: &str,
        state: &FinanceState,
        note: Option<&str>,
    ) -> Result<StateBackupInfo, CoreError>;
    fn list_backups(&self, key: &str) -> Result<Vec<StateBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &StateBackupInfo) -> Result<FinanceState, CoreError>;
}

/// Reports records that will silently contribute nothing, or fall back to defaults,
/// when the document is used for calculations.
pub fn state_warnings(state: &FinanceState) -> Vec<String> {
    let category_ids: HashSet<_> = state.expense_categories.iter().map(|c| c.id).collect();
    let mut warnings = Vec::new();

    for income in &state.income_sources {
        check_schedule(&mut warnings, "income", &income.id.to_string(), income);
    }
    for expense in &state.expenses {
        let id = expense.id.to_string();
        if !category_ids.contains(&expense.category_id) {
            warnings.push(format!(
                "expense {} references missing category {}",
                id, expense.category_id
            ));
        }
        check_schedule(&mut warnings, "expense", &id, expense);
        if let Some(pin) = expense.month.as_deref() {
            if MonthKey::parse(pin).is_err() {
                warnings.push(format!("expense {id} has malformed month `{pin}`"));
            }
        }
    }
    warnings
}

fn check_schedule<R: Scheduled>(warnings: &mut Vec<String>, kind: &str, id: &str, record: &R) {
    if !record.frequency().is_recognized() {
        warnings.push(format!(
            "{kind} {id} has unrecognized frequency `{}`",
            record.frequency()
        ));
    }
    if record.frequency().is_one_time() {
        match record.occurrence_date() {
            None => warnings.push(format!("{kind} {id} is one-time but has no date")),
            Some(date) if MonthKey::from_date_prefix(date).is_err() => {
                warnings.push(format!("{kind} {id} has malformed date `{date}`"))
            }
            Some(_) => {}
        }
    }
    if let Some(start) = record.start_month() {
        if MonthKey::parse(start).is_err() {
            warnings.push(format!("{kind} {id} has malformed start month `{start}`"));
        }
    }
}
