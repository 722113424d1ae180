#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use fintrack::{config::Config, engine::FixedClock, open_json_manager, FinanceManager};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that is removed when the test binary exits.
pub fn temp_root() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn june_10() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

/// Opens the default document under `root` with the clock frozen on `today`.
pub fn open_at(root: &PathBuf, today: NaiveDate) -> FinanceManager {
    open_json_manager(&Config::default(), root, Box::new(FixedClock::on(today)))
        .expect("open json manager")
}

/// Creates an isolated manager backed by a unique directory.
pub fn setup_manager() -> (FinanceManager, PathBuf) {
    let root = temp_root();
    (open_at(&root, june_10()), root)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
