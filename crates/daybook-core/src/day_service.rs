use chrono::{DateTime, NaiveDate, Utc};
use daybook_domain::{AppState, DailyLog};
use tracing::{debug, info};

use crate::{error::ensure_non_negative_amount, CoreError};

/// Opens and closes the per-date cash log.
pub struct DayService;

impl DayService {
    /// The log for `today`, only while it is still open.
    pub fn todays_log(state: &AppState, today: NaiveDate) -> Option<&DailyLog> {
        state.log(today).filter(|log| log.is_open())
    }

    /// Returns `Ok(None)` when a log for `today` already exists, open or closed.
    pub fn start_day(
        state: &AppState,
        today: NaiveDate,
        now: DateTime<Utc>,
        opening_cash: f64,
    ) -> Result<Option<AppState>, CoreError> {
        ensure_non_negative_amount(opening_cash)?;
        if state.log(today).is_some() {
            debug!(%today, "day already started; ignoring");
            return Ok(None);
        }

        let mut next = state.clone();
        next.daily_logs.push(DailyLog::open(today, now, opening_cash));
        info!(%today, opening_cash, "day started");
        Ok(Some(next))
    }

    /// Freezes profit and closing cash of today's open log.
    pub fn end_day(state: &AppState, today: NaiveDate) -> Option<AppState> {
        Self::todays_log(state, today)?;

        let mut next = state.clone();
        let log = next.log_mut(today)?;
        log.close();
        info!(
            %today,
            profit = log.profit.unwrap_or_default(),
            closing_cash = log.closing_cash.unwrap_or_default(),
            "day closed"
        );
        Some(next)
    }
}
