use daybook_config::ConfigError;
use daybook_core::CoreError;
use thiserror::Error;

/// Error type surfaced by the application facade.
#[derive(Debug, Error)]
pub enum DaybookError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DaybookError {
    pub fn is_no_active_day(&self) -> bool {
        matches!(self, DaybookError::Core(CoreError::NoActiveDay))
    }
}
