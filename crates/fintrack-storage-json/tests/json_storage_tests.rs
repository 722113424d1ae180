use fintrack_core::storage::FinanceStorage;
use fintrack_domain::{Expense, FinanceState, Frequency, IncomeSource};
use fintrack_storage_json::{JsonFinanceStorage, StoragePaths};
use std::fs;
use tempfile::tempdir;

fn sample_state() -> FinanceState {
    let mut state = FinanceState::with_default_categories();
    let food = state.expense_categories[2].id;
    state
        .income_sources
        .push(IncomeSource::new("Salary", 3000.0, Frequency::Monthly));
    state
        .expenses
        .push(Expense::new("Groceries", 200.0, food, Frequency::Weekly));
    state
}

#[test]
fn json_storage_can_save_and_load_state() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(StoragePaths::under(dir.path())).expect("create storage");

    let state = sample_state();
    storage
        .save_state("finance-storage", &state)
        .expect("save state");
    let loaded = storage.load_state("finance-storage").expect("load state");

    assert_eq!(loaded, state);
    let path = storage.state_path("finance-storage");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(storage.state_exists("finance-storage"));
    assert_eq!(storage.list_keys().unwrap(), vec!["finance-storage".to_string()]);
}

#[test]
fn saved_document_uses_camel_case_fields() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    storage
        .save_state("finance-storage", &sample_state())
        .expect("save state");

    let raw = fs::read_to_string(storage.state_path("finance-storage")).expect("read file");
    assert!(raw.contains("\"incomeSources\""));
    assert!(raw.contains("\"expenseCategories\""));
    assert!(raw.contains("\"categoryId\""));
    assert!(raw.contains("\"frequency\": \"weekly\""));
}

#[test]
fn missing_state_is_a_storage_error() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    let err = storage.load_state("absent").expect_err("nothing saved");
    assert!(err.to_string().contains("absent"));
    assert!(!storage.state_exists("absent"));
}

#[test]
fn overwriting_keeps_a_backup_of_the_previous_file() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(StoragePaths::under(dir.path())).expect("create storage");

    let first = sample_state();
    storage.save_state("household", &first).expect("first save");
    assert!(storage.list_backups("household").unwrap().is_empty());

    let mut second = first.clone();
    second.income_sources.clear();
    storage.save_state("household", &second).expect("second save");

    let backups = storage.list_backups("household").expect("list backups");
    assert_eq!(backups.len(), 1);
    let previous = storage
        .load_state_from_path(&backups[0].path)
        .expect("read backup");
    assert_eq!(previous.income_sources.len(), 1);
}

#[test]
fn json_storage_creates_and_restores_backups() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let storage = JsonFinanceStorage::new(paths.clone()).expect("create storage");

    let state = sample_state();
    storage.save_state("household", &state).expect("save state");

    let info = storage
        .backup_state("household", &state, Some("Before import"))
        .expect("create backup");
    assert!(info.id.contains("before-import"));
    assert_eq!(
        info.path.parent().map(|parent| parent.to_path_buf()),
        Some(paths.backup_root.join("household"))
    );

    let mut emptied = state.clone();
    emptied.expenses.clear();
    storage.save_state("household", &emptied).expect("overwrite");

    let backups = storage.list_backups("household").expect("list backups");
    assert!(
        backups.iter().any(|entry| entry.id == info.id),
        "backup list should include created backup"
    );

    let restored = storage.restore_backup(&info).expect("restore backup");
    assert_eq!(restored.expenses.len(), 1);
    let reloaded = storage.load_state("household").expect("reload");
    assert_eq!(reloaded.expenses.len(), 1);
}

#[test]
fn backups_are_pruned_to_retention() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::with_retention(StoragePaths::under(dir.path()), 2)
        .expect("create storage");
    let state = sample_state();
    for note in ["one", "two", "three", "four"] {
        storage
            .backup_state("household", &state, Some(note))
            .expect("backup");
    }
    assert_eq!(storage.list_backups("household").unwrap().len(), 2);
    assert_eq!(storage.list_backup_metadata("household").unwrap().len(), 2);
}

#[test]
fn delete_state_removes_the_document() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    storage
        .save_state("scratch", &FinanceState::new())
        .expect("save");
    storage.delete_state("scratch").expect("delete");
    assert!(storage.list_keys().unwrap().is_empty());
    storage.delete_state("scratch").expect("deleting twice is fine");
}

#[test]
fn metadata_summarizes_each_document() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    storage
        .save_state("household", &sample_state())
        .expect("save");
    let rows = storage.list_state_metadata().expect("metadata");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, "household");
    assert_eq!(rows[0].income_count, 1);
    assert_eq!(rows[0].category_count, 8);
    assert!((rows[0].monthly_savings - 2134.0).abs() < 1e-6);
}

#[test]
fn hand_edited_documents_load_with_unknown_frequencies() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    let raw = r#"{
        "incomeSources": [
            {"id": "0b7e7a4e-2f55-4a8e-9d0b-5a3c2f1e9d11", "name": "Royalties", "amount": 90, "frequency": "quarterly"}
        ]
    }"#;
    fs::write(storage.state_path("legacy"), raw).expect("write document");

    let loaded = storage.load_state("legacy").expect("load");
    assert_eq!(
        loaded.income_sources[0].frequency,
        Frequency::Other("quarterly".into())
    );
    assert!(loaded.expense_categories.is_empty());
}
