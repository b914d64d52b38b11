//! Transaction entry and reconciliation against the owning daily logs.
//!
//! A log's totals always equal the sum of the transactions it references.
//! Updates revert the old contribution and apply the new one instead of
//! patching a delta, so a kind or method change lands in the right bucket.

use chrono::{DateTime, NaiveDate, Utc};
use daybook_domain::{AppState, DailyLog, LogTotals, NewTransaction, Transaction, TransactionPatch};
use tracing::debug;
use uuid::Uuid;

use crate::{day_service::DayService, error::ensure_positive_amount, CoreError};

pub struct TransactionService;

impl TransactionService {
    /// Records a transaction against today's open log.
    pub fn add(
        state: &AppState,
        today: NaiveDate,
        now: DateTime<Utc>,
        entry: NewTransaction,
    ) -> Result<(AppState, Uuid), CoreError> {
        if DayService::todays_log(state, today).is_none() {
            return Err(CoreError::NoActiveDay);
        }
        ensure_positive_amount(entry.amount)?;

        let transaction = Transaction::new(
            entry.kind,
            entry.amount,
            entry.payment_method,
            entry.description,
            now,
        );
        let id = transaction.id;

        let mut next = state.clone();
        let log = next.log_mut(today).ok_or(CoreError::NoActiveDay)?;
        log.transaction_ids.push(id);
        log.apply_contribution(&transaction);
        next.transactions.push(transaction);

        debug!(%id, %today, "transaction added");
        Ok((next, id))
    }

    /// Returns `Ok(None)` when no transaction has the given id.
    pub fn update(
        state: &AppState,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> Result<Option<AppState>, CoreError> {
        if let Some(amount) = patch.amount {
            ensure_positive_amount(amount)?;
        }
        let Some(old) = state.transaction(id) else {
            debug!(%id, "update ignored; unknown transaction");
            return Ok(None);
        };
        let updated = old.patched(patch);

        let mut next = state.clone();
        for log in next.daily_logs.iter_mut().filter(|log| log.contains(id)) {
            log.revert_contribution(old);
            log.apply_contribution(&updated);
        }
        if let Some(slot) = next.transaction_mut(id) {
            *slot = updated;
        }

        debug!(%id, "transaction updated");
        Ok(Some(next))
    }

    /// Returns `None` when no transaction has the given id.
    pub fn delete(state: &AppState, id: Uuid) -> Option<AppState> {
        let old = state.transaction(id)?;

        let mut next = state.clone();
        for log in next.daily_logs.iter_mut().filter(|log| log.contains(id)) {
            log.revert_contribution(old);
            log.transaction_ids.retain(|owned| *owned != id);
        }
        next.transactions.retain(|txn| txn.id != id);

        debug!(%id, "transaction deleted");
        Some(next)
    }

    /// Transactions referenced by `log`, newest first. Dangling ids are skipped.
    pub fn for_log<'a>(state: &'a AppState, log: &DailyLog) -> Vec<&'a Transaction> {
        let mut listed: Vec<&Transaction> = log
            .transaction_ids
            .iter()
            .filter_map(|id| state.transaction(*id))
            .collect();
        listed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        listed
    }

    /// Sums the referenced transactions from scratch.
    pub fn recompute_totals(state: &AppState, log: &DailyLog) -> LogTotals {
        let mut totals = LogTotals::default();
        for transaction in log
            .transaction_ids
            .iter()
            .filter_map(|id| state.transaction(*id))
        {
            totals.add(transaction);
        }
        totals
    }
}
