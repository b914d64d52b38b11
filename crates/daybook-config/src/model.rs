use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Overrides both the data directory and the config location when set.
pub const DATA_HOME_ENV: &str = "DAYBOOK_HOME";

/// User-configurable preferences. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Directory holding `daybook.json` and its backups.
    pub data_dir: Option<PathBuf>,
    pub backup_retention: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// `tracing` filter directive, e.g. `daybook=debug`.
    pub log_filter: Option<String>,
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            backup_retention: Self::default_backup_retention(),
            log_filter: None,
            ui_color_enabled: true,
        }
    }
}

impl Config {
    pub fn default_backup_retention() -> usize {
        5
    }

    /// `DAYBOOK_HOME`, then the configured directory, then the platform data dir.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(home) = env::var_os(DATA_HOME_ENV).filter(|value| !value.is_empty()) {
            return PathBuf::from(home);
        }
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("daybook")
    }
}
