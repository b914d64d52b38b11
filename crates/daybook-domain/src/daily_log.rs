//! The per-date accrual and cash ledger.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::Rescale,
    transaction::{PaymentMethod, Transaction, TransactionKind},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    /// Calendar date; at most one log exists per date.
    pub id: NaiveDate,
    /// Moment the day was started.
    #[serde(default)]
    pub date: DateTime<Utc>,
    pub opening_cash: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_cash: Option<f64>,
    #[serde(default)]
    pub transaction_ids: Vec<Uuid>,
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub cash_income: f64,
    #[serde(default)]
    pub cash_expenses: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    pub status: DayStatus,
}

impl DailyLog {
    pub fn open(day: NaiveDate, opened_at: DateTime<Utc>, opening_cash: f64) -> Self {
        Self {
            id: day,
            date: opened_at,
            opening_cash,
            closing_cash: None,
            transaction_ids: Vec::new(),
            total_income: 0.0,
            total_expenses: 0.0,
            cash_income: 0.0,
            cash_expenses: 0.0,
            profit: None,
            status: DayStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, DayStatus::Open)
    }

    pub fn contains(&self, transaction_id: Uuid) -> bool {
        self.transaction_ids.contains(&transaction_id)
    }

    /// Adds the transaction's amount to the running totals.
    pub fn apply_contribution(&mut self, transaction: &Transaction) {
        self.post(
            transaction.kind,
            transaction.payment_method,
            transaction.amount,
        );
    }

    /// Removes the transaction's amount from the running totals, by its kind
    /// and payment method.
    pub fn revert_contribution(&mut self, transaction: &Transaction) {
        self.post(
            transaction.kind,
            transaction.payment_method,
            -transaction.amount,
        );
    }

    fn post(&mut self, kind: TransactionKind, method: PaymentMethod, delta: f64) {
        match kind {
            TransactionKind::Income => {
                self.total_income += delta;
                if method.is_cash() {
                    self.cash_income += delta;
                }
            }
            TransactionKind::Expense => {
                self.total_expenses += delta;
                if method.is_cash() {
                    self.cash_expenses += delta;
                }
            }
        }
    }

    /// Freezes profit and closing cash and marks the log closed. Has no effect
    /// on a log that is already closed.
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.profit = Some(self.live_profit());
        self.closing_cash = Some(self.live_closing_cash());
        self.status = DayStatus::Closed;
    }

    pub fn live_profit(&self) -> f64 {
        self.total_income - self.total_expenses
    }

    pub fn live_closing_cash(&self) -> f64 {
        self.opening_cash + self.cash_income - self.cash_expenses
    }
}

impl Rescale for DailyLog {
    fn rescale(&mut self, rate: f64) {
        self.opening_cash *= rate;
        self.closing_cash = self.closing_cash.map(|value| value * rate);
        self.total_income *= rate;
        self.total_expenses *= rate;
        self.cash_income *= rate;
        self.cash_expenses *= rate;
        self.profit = self.profit.map(|value| value * rate);
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Lifecycle of a daily log. `Closed` is terminal.
pub enum DayStatus {
    Open,
    Closed,
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DayStatus::Open => "open",
            DayStatus::Closed => "closed",
        };
        f.pad(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    #[test]
    fn cash_subtotals_only_track_cash() {
        let mut log = DailyLog::open(day(), Utc::now(), 100.0);
        let now = Utc::now();
        log.apply_contribution(&Transaction::new(
            TransactionKind::Income,
            50.0,
            PaymentMethod::Cash,
            "",
            now,
        ));
        log.apply_contribution(&Transaction::new(
            TransactionKind::Expense,
            20.0,
            PaymentMethod::Card,
            "",
            now,
        ));
        assert_eq!(log.total_income, 50.0);
        assert_eq!(log.total_expenses, 20.0);
        assert_eq!(log.cash_income, 50.0);
        assert_eq!(log.cash_expenses, 0.0);
    }

    #[test]
    fn close_freezes_once() {
        let mut log = DailyLog::open(day(), Utc::now(), 10.0);
        log.total_income = 5.0;
        log.cash_income = 5.0;
        log.close();
        assert_eq!(log.profit, Some(5.0));
        assert_eq!(log.closing_cash, Some(15.0));

        log.total_income = 500.0;
        log.close();
        assert_eq!(log.profit, Some(5.0));
        assert_eq!(log.status, DayStatus::Closed);
    }

    #[test]
    fn legacy_log_without_cash_fields_defaults_them() {
        let json = r#"{
            "id": "2024-05-01",
            "date": "2024-05-01T08:00:00Z",
            "openingCash": 20.0,
            "transactionIds": [],
            "totalIncome": 0.0,
            "totalExpenses": 0.0,
            "status": "open"
        }"#;
        let log: DailyLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.cash_income, 0.0);
        assert_eq!(log.cash_expenses, 0.0);
        assert!(log.profit.is_none());
    }
}
