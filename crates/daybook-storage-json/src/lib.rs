use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use daybook_core::{
    storage::{state_warnings, LoadReport, StateStorage},
    CoreError,
};
use daybook_domain::AppState;
use tracing::{debug, warn};

mod migrate;

pub use migrate::migrate_value;

const STATE_STEM: &str = "daybook";
const EXTENSION: &str = "json";
const BACKUP_DIR: &str = "backups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Single-slot JSON persistence with rolling backups of the previous file.
#[derive(Debug, Clone)]
pub struct JsonStateStorage {
    data_dir: PathBuf,
    retention: usize,
}

/// A timestamped copy of an earlier snapshot.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl JsonStateStorage {
    pub fn new(data_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(data_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(data_dir: PathBuf, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            retention: retention.max(1),
        })
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(format!("{STATE_STEM}.{EXTENSION}"))
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir.join(BACKUP_DIR)
    }

    /// Newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        let dir = self.backups_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
                entries.push(BackupInfo {
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    size_bytes,
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| {
            Reverse(a.created_at)
                .cmp(&Reverse(b.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    /// Copies the backup over the current slot and returns the decoded state.
    pub fn restore_backup(&self, backup: &BackupInfo) -> Result<LoadReport, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!("backup `{}` not found", backup.id)));
        }
        // Read first: backing up the current slot may reuse the same file name.
        let data = fs::read_to_string(&backup.path)?;
        let report = decode_state(&data)?;
        let target = self.state_path();
        self.backup_existing_file(&target)?;
        let tmp = tmp_path(&target);
        write_atomic(&tmp, &data)?;
        fs::rename(&tmp, &target)?;
        Ok(report)
    }

    fn backup_existing_file(&self, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backups_dir();
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let backup_path = dir.join(format!("{STATE_STEM}_{timestamp}.{EXTENSION}"));
        fs::copy(path, &backup_path)?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StateStorage for JsonStateStorage {
    fn load(&self) -> Result<Option<LoadReport>, CoreError> {
        let path = self.state_path();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let report = decode_state(&data)?;
        debug!(path = %path.display(), migrations = report.migrations.len(), "state loaded");
        Ok(Some(report))
    }

    fn save(&self, state: &AppState) -> Result<(), CoreError> {
        let path = self.state_path();
        fs::create_dir_all(&self.data_dir)?;
        self.backup_existing_file(&path)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serialize_state(state)?)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "state saved");
        Ok(())
    }
}

/// Parses a persisted snapshot, applying forward migrations first.
pub fn decode_state(data: &str) -> Result<LoadReport, CoreError> {
    let mut value: serde_json::Value =
        serde_json::from_str(data).map_err(|err| CoreError::Serde(err.to_string()))?;
    let outcome = migrate_value(&mut value)?;
    let state: AppState =
        serde_json::from_value(value).map_err(|err| CoreError::Serde(err.to_string()))?;
    for step in &outcome.applied {
        warn!(migration = %step, "migrated persisted state");
    }
    Ok(LoadReport {
        warnings: state_warnings(&state),
        migrations: outcome.applied,
        schema_version: outcome.found_version,
        state,
    })
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{EXTENSION}"))?;
    let mut segments = trimmed.rsplitn(3, '_');
    let time = segments.next()?;
    let date = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 4) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
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
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_state(state: &AppState) -> Result<String, CoreError> {
    serde_json::to_string_pretty(state).map_err(|err| CoreError::Serde(err.to_string()))
}
