use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use daybook_domain::{AppState, TransactionKind, WeekdayTotals, WeeklySummary};

/// Read-only aggregations over logs and their transactions.
pub struct SummaryService;

impl SummaryService {
    /// Weekly totals of every day except `today`, newest week first.
    ///
    /// Transactions are bucketed by the date of the log that owns them, not by
    /// their own timestamp.
    pub fn weekly_summaries(state: &AppState, today: NaiveDate) -> Vec<WeeklySummary> {
        let mut weeks: BTreeMap<NaiveDate, WeeklySummary> = BTreeMap::new();

        for log in state.daily_logs.iter().filter(|log| log.id != today) {
            let start = week_start(log.id);
            for transaction in log
                .transaction_ids
                .iter()
                .filter_map(|id| state.transaction(*id))
            {
                weeks
                    .entry(start)
                    .or_insert_with(|| empty_week(start))
                    .push(log.id, transaction.clone());
            }
        }

        let mut summaries: Vec<WeeklySummary> = weeks.into_values().rev().collect();
        for day in summaries.iter_mut().flat_map(|week| week.days.values_mut()) {
            day.sort_by_key(|txn| txn.timestamp);
        }
        summaries
    }

    /// Income and expenses per weekday, Monday first, for the week containing
    /// `day`.
    pub fn weekday_breakdown(state: &AppState, day: NaiveDate) -> [WeekdayTotals; 7] {
        let start = week_start(day);
        let end = start + Duration::days(6);
        let mut totals = WEEKDAYS.map(|weekday| WeekdayTotals {
            weekday,
            income: 0.0,
            expenses: 0.0,
        });

        for log in state
            .daily_logs
            .iter()
            .filter(|log| log.id >= start && log.id <= end)
        {
            let slot = &mut totals[log.id.weekday().num_days_from_monday() as usize];
            for transaction in log
                .transaction_ids
                .iter()
                .filter_map(|id| state.transaction(*id))
            {
                match transaction.kind {
                    TransactionKind::Income => slot.income += transaction.amount,
                    TransactionKind::Expense => slot.expenses += transaction.amount,
                }
            }
        }
        totals
    }
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// ISO week label, e.g. `2025-W02`.
pub fn week_id(day: NaiveDate) -> String {
    let iso = day.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

fn empty_week(start: NaiveDate) -> WeeklySummary {
    WeeklySummary {
        week_id: week_id(start),
        start,
        end: start + Duration::days(6),
        total_income: 0.0,
        total_expenses: 0.0,
        profit: 0.0,
        days: BTreeMap::new(),
    }
}
