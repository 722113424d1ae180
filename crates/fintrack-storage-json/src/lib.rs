//! JSON-file persistence for finance documents.
//!
//! Each storage key maps to one pretty-printed `<key>.json` file under the state
//! root. Overwriting a document first copies the previous file into the key's
//! backup directory, and backups beyond the retention limit are pruned.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{info, warn};

use fintrack_core::{
    storage::{state_warnings, FinanceStorage, StateBackupInfo},
    CoreError, SummaryService,
};
use fintrack_domain::FinanceState;

const STATE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;
const FALLBACK_KEY: &str = "finance-storage";

/// Directories used by [`JsonFinanceStorage`].
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub state_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `<root>/data` for documents and `<root>/backups` for backups.
    pub fn under(root: &Path) -> Self {
        Self {
            state_root: root.join("data"),
            backup_root: root.join("backups"),
        }
    }
}

#[derive(Clone)]
pub struct JsonFinanceStorage {
    state_root: PathBuf,
    backup_root: PathBuf,
    retention: usize,
}

impl JsonFinanceStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.state_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            state_root: paths.state_root,
            backup_root: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn state_path(&self, key: &str) -> PathBuf {
        self.state_root
            .join(format!("{}.{}", canonical_key(key), STATE_EXTENSION))
    }

    pub fn list_state_metadata(&self) -> Result<Vec<StateMetadata>, CoreError> {
        let mut entries = Vec::new();
        for key in self.list_keys()? {
            let state = self.load_state(&key)?;
            let steady = SummaryService::steady_state(&state);
            entries.push(StateMetadata {
                path: self.state_path(&key),
                key,
                updated_at: state.updated_at,
                income_count: state.income_sources.len(),
                expense_count: state.expenses.len(),
                category_count: state.expense_categories.len(),
                recorded_months: state.monthly_data.len(),
                monthly_savings: steady.savings(),
            });
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    pub fn list_backup_metadata(&self, key: &str) -> Result<Vec<BackupMetadata>, CoreError> {
        let rows: Vec<BackupMetadata> = self
            .list_backups(key)?
            .into_iter()
            .map(|entry| BackupMetadata {
                size_bytes: fs::metadata(&entry.path).map(|meta| meta.len()).unwrap_or(0),
                created_at: parse_backup_timestamp(&entry.id),
                name: entry.id,
                path: entry.path,
            })
            .collect();
        Ok(rows)
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.backup_root.join(canonical_key(key))
    }

    fn write_backup_file(
        &self,
        state: &FinanceState,
        key: &str,
        note: Option<&str>,
    ) -> Result<StateBackupInfo, CoreError> {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let path = self.next_backup_path(key, &timestamp, note)?;
        write_atomic(&path, &serialize_state(state)?)?;
        self.prune_backups(key)?;
        let id = file_name_of(&path);
        info!(key, backup = %id, "created backup");
        Ok(StateBackupInfo {
            key: canonical_key(key),
            id,
            created_at: timestamp,
            path,
        })
    }

    fn backup_existing_file(&self, key: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_path = self.next_backup_path(key, &timestamp, None)?;
        fs::copy(path, &backup_path)?;
        self.prune_backups(key)?;
        Ok(())
    }

    /// First free `<key>_<timestamp>[_<note>][_<n>].json` path in the key's backup directory.
    fn next_backup_path(
        &self,
        key: &str,
        timestamp: &str,
        note: Option<&str>,
    ) -> Result<PathBuf, CoreError> {
        let dir = self.backup_dir(key);
        fs::create_dir_all(&dir)?;
        let mut stem = format!("{}_{}", canonical_key(key), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let mut candidate = dir.join(format!("{stem}.{STATE_EXTENSION}"));
        let mut counter = 1;
        while candidate.exists() {
            candidate = dir.join(format!("{stem}_{counter}.{STATE_EXTENSION}"));
            counter += 1;
        }
        Ok(candidate)
    }

    fn prune_backups(&self, key: &str) -> Result<(), CoreError> {
        for entry in self.list_backups(key)?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl FinanceStorage for JsonFinanceStorage {
    fn save_state(&self, key: &str, state: &FinanceState) -> Result<(), CoreError> {
        let path = self.state_path(key);
        self.backup_existing_file(key, &path)?;
        save_state_to_path(state, &path)?;
        info!(key, path = %path.display(), "saved finance state");
        Ok(())
    }

    fn load_state(&self, key: &str) -> Result<FinanceState, CoreError> {
        let path = self.state_path(key);
        if !path.exists() {
            return Err(CoreError::Storage(format!("no finance state stored under `{key}`")));
        }
        let state = load_state_from_path(&path)?;
        for warning in state_warnings(&state) {
            warn!(key, "{warning}");
        }
        Ok(state)
    }

    fn state_exists(&self, key: &str) -> bool {
        self.state_path(key).is_file()
    }

    fn list_keys(&self) -> Result<Vec<String>, CoreError> {
        if !self.state_root.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.state_root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(STATE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn delete_state(&self, key: &str) -> Result<(), CoreError> {
        let path = self.state_path(key);
        if path.exists() {
            fs::remove_file(path)?;
            info!(key, "deleted finance state");
        }
        Ok(())
    }

    fn save_state_to_path(&self, state: &FinanceState, path: &Path) -> Result<(), CoreError> {
        if path.starts_with(&self.state_root) {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                self.backup_existing_file(stem, path)?;
            }
        }
        save_state_to_path(state, path)
    }

    fn load_state_from_path(&self, path: &Path) -> Result<FinanceState, CoreError> {
        load_state_from_path(path)
    }

    fn backup_state(
        &self,
        key: &str,
        state: &FinanceState,
        note: Option<&str>,
    ) -> Result<StateBackupInfo, CoreError> {
        self.write_backup_file(state, key, note)
    }

    fn list_backups(&self, key: &str) -> Result<Vec<StateBackupInfo>, CoreError> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let canonical = canonical_key(key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(STATE_EXTENSION) {
                continue;
            }
            let id = file_name_of(&path);
            entries.push(StateBackupInfo {
                key: canonical.clone(),
                created_at: parse_backup_timestamp(&id)
                    .map(|ts| ts.format(BACKUP_TIMESTAMP_FORMAT).to_string())
                    .unwrap_or_default(),
                id,
                path,
            });
        }
        entries.sort_by(|a, b| backup_order(&b.id).cmp(&backup_order(&a.id)));
        Ok(entries)
    }

    fn restore_backup(&self, backup: &StateBackupInfo) -> Result<FinanceState, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let state = load_state_from_path(&backup.path)?;
        let target = self.state_path(&backup.key);
        self.backup_existing_file(&backup.key, &target)?;
        save_state_to_path(&state, &target)?;
        info!(key = %backup.key, backup = %backup.id, "restored backup");
        Ok(state)
    }
}

/// Saves a finance document to an arbitrary path, replacing it atomically.
pub fn save_state_to_path(state: &FinanceState, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_state(state)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_state_from_path(path: &Path) -> Result<FinanceState, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

#[derive(Debug, Clone)]
pub struct StateMetadata {
    pub key: String,
    pub path: PathBuf,
    pub updated_at: DateTime<Utc>,
    pub income_count: usize,
    pub expense_count: usize,
    pub category_count: usize,
    pub recorded_months: usize,
    /// Steady-state monthly savings of the stored records.
    pub monthly_savings: f64,
}

#[derive(Debug, Clone)]
pub struct BackupMetadata {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        FALLBACK_KEY.into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Finds the `YYYYMMDD_HHMMSS` pair in a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{STATE_EXTENSION}"))?;
    let segments: Vec<&str> = stem.split('_').collect();
    segments.windows(2).find_map(|pair| {
        if !is_digits(pair[0], 8) || !is_digits(pair[1], 6) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}{}", pair[0], pair[1]), "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| naive.and_utc())
    })
}

/// Collision counter appended after the timestamp (and note), 0 when absent.
fn backup_sequence(name: &str) -> u32 {
    let Some(stem) = name.strip_suffix(&format!(".{STATE_EXTENSION}")) else {
        return 0;
    };
    let segments: Vec<&str> = stem.split('_').collect();
    let Some(stamp_end) = segments
        .windows(2)
        .position(|pair| is_digits(pair[0], 8) && is_digits(pair[1], 6))
        .map(|index| index + 2)
    else {
        return 0;
    };
    match segments.last() {
        Some(last) if segments.len() > stamp_end => last.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Sort key for backups: timestamp, then collision counter, then name.
fn backup_order(name: &str) -> (Option<DateTime<Utc>>, u32, &str) {
    (parse_backup_timestamp(name), backup_sequence(name), name)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_state(state: &FinanceState) -> Result<String, CoreError> {
    serde_json::to_string_pretty(state).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_keeps_dashes_and_falls_back() {
        assert_eq!(canonical_key("finance-storage"), "finance-storage");
        assert_eq!(canonical_key(" My Budget "), "my_budget");
        assert_eq!(canonical_key("///"), FALLBACK_KEY);
    }

    #[test]
    fn notes_are_slugged() {
        assert_eq!(
            sanitize_backup_note(Some("  Before Import. v2 ")),
            Some("before-import-v2".into())
        );
        assert_eq!(sanitize_backup_note(Some("!!!")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }

    #[test]
    fn timestamps_parse_with_notes_and_counters() {
        let plain = parse_backup_timestamp("finance-storage_20240615_083000.json").unwrap();
        assert_eq!(plain.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-06-15 08:30:00");
        assert!(parse_backup_timestamp("finance-storage_20240615_083000_pre-import_1.json").is_some());
        assert!(parse_backup_timestamp("finance-storage.json").is_none());
    }

    #[test]
    fn collision_counters_order_numerically() {
        assert_eq!(backup_sequence("finance-storage_20240615_083000.json"), 0);
        assert_eq!(backup_sequence("finance-storage_20240615_083000_2.json"), 2);
        assert_eq!(backup_sequence("finance-storage_20240615_083000_note_10.json"), 10);
        assert_eq!(backup_sequence("finance-storage_20240615_083000_note.json"), 0);
        assert!(
            backup_order("finance-storage_20240615_083000_10.json")
                > backup_order("finance-storage_20240615_083000_2.json")
        );
    }

    #[test]
    fn same_second_backups_list_newest_counter_first() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFinanceStorage::new(StoragePaths::under(dir.path())).unwrap();
        let backups = dir.path().join("backups").join("finance-storage");
        fs::create_dir_all(&backups).unwrap();
        for suffix in ["", "_2", "_10", "_1"] {
            let name = format!("finance-storage_20240615_083000{suffix}.json");
            fs::write(backups.join(name), "{}").unwrap();
        }

        let ids: Vec<String> = storage
            .list_backups("finance-storage")
            .unwrap()
            .into_iter()
            .map(|backup| backup.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "finance-storage_20240615_083000_10.json",
                "finance-storage_20240615_083000_2.json",
                "finance-storage_20240615_083000_1.json",
                "finance-storage_20240615_083000.json",
            ]
        );
    }
}
