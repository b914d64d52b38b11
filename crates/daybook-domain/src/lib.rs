//! daybook-domain
//!
//! Pure domain models (Transaction, DailyLog, Debt, Settings, AppState).
//! No I/O, no CLI, no storage. Only data types and their local invariants.

pub mod common;
pub mod currency;
pub mod daily_log;
pub mod debt;
pub mod settings;
pub mod state;
pub mod summary;
pub mod transaction;

pub use common::*;
pub use currency::*;
pub use daily_log::*;
pub use debt::*;
pub use settings::*;
pub use state::*;
pub use summary::*;
pub use transaction::*;
