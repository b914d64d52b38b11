//! Application facade: one snapshot, one storage slot, save after every change.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use daybook_core::{
    storage::{state_warnings, MemoryStateStorage, StateStorage},
    Clock, DayService, DebtService, EntityStore, RateProvider, SettingsService, StaticRateTable,
    SuggestionService, SummaryService, SystemClock, TransactionService, UiService,
};
use daybook_domain::{
    AppState, DailyLog, DebtPatch, DebtTotals, NewDebt, NewTransaction, SettingsPatch,
    Transaction, TransactionPatch, WeekdayTotals, WeeklySummary,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::DaybookError;

/// What happened when the persisted snapshot was read at startup.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
    /// Set when the stored snapshot could not be read and the initial state was used.
    pub fallback_reason: Option<String>,
}

/// Owns the current snapshot and writes it back after each accepted mutation.
///
/// No-op mutations (starting a day twice, deleting an unknown id) neither
/// publish nor save.
pub struct AppStore {
    store: EntityStore,
    storage: Box<dyn StateStorage>,
    clock: Arc<dyn Clock>,
    rates: Arc<dyn RateProvider>,
    load_summary: LoadSummary,
    last_save_error: Option<String>,
}

impl AppStore {
    /// Loads once from `storage`. A failed load falls back to the initial state.
    pub fn open(
        storage: Box<dyn StateStorage>,
        clock: Arc<dyn Clock>,
        rates: Arc<dyn RateProvider>,
    ) -> Self {
        let mut load_summary = LoadSummary::default();
        let state = match storage.load() {
            Ok(Some(report)) => {
                for note in &report.migrations {
                    info!(migration = %note, "applied migration on load");
                }
                for warning in &report.warnings {
                    warn!(%warning, "loaded state has inconsistencies");
                }
                load_summary.migrations = report.migrations;
                load_summary.warnings = report.warnings;
                report.state
            }
            Ok(None) => {
                debug!("no saved state; starting fresh");
                AppState::initial()
            }
            Err(err) => {
                warn!(error = %err, "failed to load saved state; starting fresh");
                load_summary.fallback_reason = Some(err.to_string());
                AppState::initial()
            }
        };

        Self {
            store: EntityStore::new(state),
            storage,
            clock,
            rates,
            load_summary,
            last_save_error: None,
        }
    }

    /// Wall clock and the built-in rate table.
    pub fn with_defaults(storage: Box<dyn StateStorage>) -> Self {
        Self::open(storage, Arc::new(SystemClock), Arc::new(StaticRateTable::new()))
    }

    pub fn in_memory() -> Self {
        Self::with_defaults(Box::new(MemoryStateStorage::new()))
    }

    pub fn state(&self) -> Arc<AppState> {
        self.store.get_state()
    }

    pub fn load_summary(&self) -> &LoadSummary {
        &self.load_summary
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn todays_log(&self) -> Option<DailyLog> {
        DayService::todays_log(&self.state(), self.today()).cloned()
    }

    /// `Ok(false)` when today already has a log.
    pub fn start_day(&mut self, opening_cash: f64) -> Result<bool, DaybookError> {
        let current = self.state();
        match DayService::start_day(&current, self.today(), self.clock.now(), opening_cash)? {
            Some(next) => {
                self.commit(next);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns the closed log, or `None` when there was no open log for today.
    pub fn end_day(&mut self) -> Option<DailyLog> {
        let today = self.today();
        let next = DayService::end_day(&self.state(), today)?;
        let closed = next.log(today).cloned();
        self.commit(next);
        closed
    }

    pub fn add_transaction(&mut self, entry: NewTransaction) -> Result<Uuid, DaybookError> {
        let current = self.state();
        let (next, id) =
            TransactionService::add(&current, self.today(), self.clock.now(), entry)?;
        self.commit(next);
        Ok(id)
    }

    /// `Ok(false)` when no transaction has the id.
    pub fn update_transaction(
        &mut self,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> Result<bool, DaybookError> {
        let current = self.state();
        Ok(self.commit_if(TransactionService::update(&current, id, patch)?))
    }

    pub fn delete_transaction(&mut self, id: Uuid) -> bool {
        let current = self.state();
        self.commit_if(TransactionService::delete(&current, id))
    }

    pub fn add_debt(&mut self, entry: NewDebt) -> Result<Uuid, DaybookError> {
        let current = self.state();
        let (next, id) = DebtService::add(&current, self.clock.now(), entry)?;
        self.commit(next);
        Ok(id)
    }

    pub fn update_debt(&mut self, id: Uuid, patch: &DebtPatch) -> Result<bool, DaybookError> {
        let current = self.state();
        Ok(self.commit_if(DebtService::update(&current, self.clock.now(), id, patch)?))
    }

    pub fn delete_debt(&mut self, id: Uuid) -> bool {
        let current = self.state();
        self.commit_if(DebtService::delete(&current, id))
    }

    pub fn update_settings(&mut self, patch: &SettingsPatch) {
        let next = SettingsService::update(&self.state(), self.rates.as_ref(), patch);
        self.commit(next);
    }

    pub fn reset_data(&mut self) {
        let next = SettingsService::reset(&self.state());
        self.commit(next);
    }

    /// Presentation only; nothing is written to storage.
    pub fn toggle_transaction_sheet(&mut self, open: bool, editing: Option<Uuid>) {
        let next = UiService::toggle_transaction_sheet(&self.state(), open, editing);
        self.store.replace(next);
    }

    /// Today's transactions, newest first. Empty when the day is not open.
    pub fn todays_transactions(&self) -> Vec<Transaction> {
        let state = self.state();
        DayService::todays_log(&state, self.today())
            .map(|log| {
                TransactionService::for_log(&state, log)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn transactions_for(&self, day: NaiveDate) -> Vec<Transaction> {
        let state = self.state();
        state
            .log(day)
            .map(|log| {
                TransactionService::for_log(&state, log)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn weekly_summaries(&self) -> Vec<WeeklySummary> {
        SummaryService::weekly_summaries(&self.state(), self.today())
    }

    pub fn weekday_breakdown(&self, day: NaiveDate) -> [WeekdayTotals; 7] {
        SummaryService::weekday_breakdown(&self.state(), day)
    }

    pub fn debt_totals(&self) -> DebtTotals {
        DebtService::totals(&self.state())
    }

    pub fn suggest_descriptions(&self, input: &str, limit: usize) -> Vec<String> {
        SuggestionService::suggest(&self.state(), input, limit)
    }

    /// Reference anomalies plus any log whose stored totals drift from the
    /// sum of its transactions.
    pub fn audit(&self) -> Vec<String> {
        let state = self.state();
        let mut findings = state_warnings(&state);
        for log in &state.daily_logs {
            let totals = TransactionService::recompute_totals(&state, log);
            let checks = [
                ("totalIncome", log.total_income, totals.total_income),
                ("totalExpenses", log.total_expenses, totals.total_expenses),
                ("cashIncome", log.cash_income, totals.cash_income),
                ("cashExpenses", log.cash_expenses, totals.cash_expenses),
            ];
            for (field, stored, expected) in checks {
                if !approx_eq(stored, expected) {
                    findings.push(format!(
                        "log {} {field} is {stored} but transactions sum to {expected}",
                        log.id
                    ));
                }
            }
        }
        findings
    }

    /// Writes the current snapshot unconditionally.
    pub fn flush(&mut self) -> Result<(), DaybookError> {
        let snapshot = self.state();
        self.storage.save(&snapshot)?;
        self.last_save_error = None;
        Ok(())
    }

    fn commit_if(&mut self, next: Option<AppState>) -> bool {
        match next {
            Some(next) => {
                self.commit(next);
                true
            }
            None => false,
        }
    }

    fn commit(&mut self, next: AppState) {
        self.store.replace(next);
        let snapshot = self.state();
        match self.storage.save(&snapshot) {
            Ok(()) => self.last_save_error = None,
            Err(err) => {
                error!(error = %err, "failed to persist state; keeping in-memory copy");
                self.last_save_error = Some(err.to_string());
            }
        }
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

/// The single mutual-exclusion boundary for callers on several threads.
#[derive(Clone)]
pub struct SharedAppStore {
    inner: Arc<Mutex<AppStore>>,
}

impl SharedAppStore {
    pub fn new(store: AppStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access. A panic in another caller does not
    /// wedge the store; the last published snapshot is still consistent.
    pub fn with<R>(&self, f: impl FnOnce(&mut AppStore) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn state(&self) -> Arc<AppState> {
        self.with(|store| store.state())
    }
}
