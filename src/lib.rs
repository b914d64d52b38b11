#![doc(test(attr(deny(warnings))))]

//! Daybook keeps a small business's daily cash log: open the day with the
//! cash on hand, record income and expenses, close the day with a frozen
//! profit and closing cash. Debts, currency switching and weekly reports sit
//! on top of the same snapshot.

pub mod cli;
pub mod currency;
pub mod errors;
pub mod report;
pub mod store;
pub mod utils;

pub use daybook_core;
pub use daybook_domain;
pub use errors::DaybookError;
pub use store::{AppStore, SharedAppStore};

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Like [`init`], with an extra filter directive such as `daybook=debug`.
/// Only the first call takes effect.
pub fn init_with_filter(directive: Option<&str>) {
    utils::init_tracing(directive);
}
