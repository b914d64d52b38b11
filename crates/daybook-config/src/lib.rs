//! daybook-config
//!
//! Persistent user configuration: where the data lives, backup retention,
//! log filtering and terminal colors.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, DATA_HOME_ENV};
