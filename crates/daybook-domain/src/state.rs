use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{daily_log::DailyLog, debt::Debt, settings::Settings, transaction::Transaction};

/// Version 1 is the layout without cash subtotals on daily logs.
pub const CURRENT_SCHEMA_VERSION: u8 = 2;

/// Complete snapshot of the bookkeeping data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default = "AppState::schema_version_default")]
    pub schema_version: u8,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub daily_logs: Vec<DailyLog>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub settings: Settings,
    /// Transient presentation flags; never persisted.
    #[serde(skip)]
    pub ui: UiState,
}

impl AppState {
    pub fn initial() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions: Vec::new(),
            daily_logs: Vec::new(),
            debts: Vec::new(),
            settings: Settings::default(),
            ui: UiState::default(),
        }
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn log(&self, day: NaiveDate) -> Option<&DailyLog> {
        self.daily_logs.iter().find(|log| log.id == day)
    }

    pub fn log_mut(&mut self, day: NaiveDate) -> Option<&mut DailyLog> {
        self.daily_logs.iter_mut().find(|log| log.id == day)
    }

    pub fn debt(&self, id: Uuid) -> Option<&Debt> {
        self.debts.iter().find(|debt| debt.id == id)
    }

    pub fn debt_mut(&mut self, id: Uuid) -> Option<&mut Debt> {
        self.debts.iter_mut().find(|debt| debt.id == id)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub is_transaction_sheet_open: bool,
    pub editing_transaction_id: Option<Uuid>,
}
