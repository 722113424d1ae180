pub mod finance_manager;

pub use finance_manager::FinanceManager;

use std::path::Path;

use fintrack_config::Config;
use fintrack_core::{storage::FinanceStorage, Clock};
use fintrack_domain::FinanceState;
use fintrack_storage_json::{JsonFinanceStorage, StoragePaths};

use crate::{currency, errors::FinanceResult};

/// Opens the document named by `config.storage_key` from JSON files under `data_root`.
///
/// A document that does not exist yet starts with the default categories and the
/// configured display currency.
pub fn open_json_manager(
    config: &Config,
    data_root: &Path,
    clock: Box<dyn Clock>,
) -> FinanceResult<FinanceManager> {
    let storage = JsonFinanceStorage::new(StoragePaths::under(data_root))?;
    if storage.state_exists(&config.storage_key) {
        return FinanceManager::open(Box::new(storage), clock, config.storage_key.clone());
    }
    let mut state = FinanceState::with_default_categories();
    state.settings.currency = currency::resolve(&config.currency)?;
    Ok(FinanceManager::with_state(
        Box::new(storage),
        clock,
        config.storage_key.clone(),
        state,
    ))
}
