//! daybook-core
//!
//! Business rules for the daybook: day lifecycle, transaction reconciliation,
//! debts, currency rescale and derived summaries.
//! Depends on daybook-domain. No CLI, no terminal I/O, no direct file access.
//!
//! Every service computes the next [`AppState`](daybook_domain::AppState) from
//! the previous one and leaves the input untouched, so a published snapshot is
//! never observed half-updated.

pub mod day_service;
pub mod debt_service;
pub mod error;
pub mod rates;
pub mod settings_service;
pub mod storage;
pub mod store;
pub mod suggestion_service;
pub mod summary_service;
pub mod time;
pub mod transaction_service;
pub mod ui_service;

pub use day_service::*;
pub use debt_service::*;
pub use error::CoreError;
pub use rates::{RateProvider, StaticRateTable};
pub use settings_service::*;
pub use store::EntityStore;
pub use suggestion_service::*;
pub use summary_service::*;
pub use time::{Clock, SystemClock};
pub use transaction_service::*;
pub use ui_service::UiService;

#[cfg(test)]
mod tests;
