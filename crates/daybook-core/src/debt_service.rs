use chrono::{DateTime, Utc};
use daybook_domain::{AppState, Debt, DebtKind, DebtPatch, DebtTotals, NewDebt};
use tracing::debug;
use uuid::Uuid;

use crate::{error::ensure_non_negative_amount, CoreError};

/// CRUD over receivables and payables. Debts never touch the daily logs.
pub struct DebtService;

impl DebtService {
    pub fn add(
        state: &AppState,
        now: DateTime<Utc>,
        entry: NewDebt,
    ) -> Result<(AppState, Uuid), CoreError> {
        ensure_non_negative_amount(entry.amount)?;
        let debt = Debt::new(entry, now);
        let id = debt.id;

        let mut next = state.clone();
        next.debts.push(debt);
        debug!(%id, "debt added");
        Ok((next, id))
    }

    /// Applies `patch` and refreshes `last_updated`. `Ok(None)` for an unknown id.
    pub fn update(
        state: &AppState,
        now: DateTime<Utc>,
        id: Uuid,
        patch: &DebtPatch,
    ) -> Result<Option<AppState>, CoreError> {
        if let Some(amount) = patch.amount {
            ensure_non_negative_amount(amount)?;
        }
        if state.debt(id).is_none() {
            debug!(%id, "update ignored; unknown debt");
            return Ok(None);
        }

        let mut next = state.clone();
        if let Some(debt) = next.debt_mut(id) {
            patch.apply_to(debt);
            debt.last_updated = now;
        }
        debug!(%id, "debt updated");
        Ok(Some(next))
    }

    pub fn delete(state: &AppState, id: Uuid) -> Option<AppState> {
        state.debt(id)?;
        let mut next = state.clone();
        next.debts.retain(|debt| debt.id != id);
        debug!(%id, "debt deleted");
        Some(next)
    }

    pub fn totals(state: &AppState) -> DebtTotals {
        let mut totals = DebtTotals::default();
        for debt in &state.debts {
            match debt.kind {
                DebtKind::OwedToMe => totals.owed_to_me += debt.amount,
                DebtKind::IOwe => totals.i_owe += debt.amount,
            }
        }
        totals.net = totals.owed_to_me - totals.i_owe;
        totals
    }
}
