//! Read-only aggregates derived from the app state for dashboards and reports.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
/// Running totals of a daily log recomputed from its transactions.
pub struct LogTotals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub cash_income: f64,
    pub cash_expenses: f64,
}

impl LogTotals {
    pub fn add(&mut self, transaction: &Transaction) {
        let cash = transaction.payment_method.is_cash();
        match transaction.kind {
            TransactionKind::Income => {
                self.total_income += transaction.amount;
                if cash {
                    self.cash_income += transaction.amount;
                }
            }
            TransactionKind::Expense => {
                self.total_expenses += transaction.amount;
                if cash {
                    self.cash_expenses += transaction.amount;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Income and expenses of one Monday-starting week.
pub struct WeeklySummary {
    /// ISO week label such as `2025-W07`.
    pub week_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_income: f64,
    pub total_expenses: f64,
    pub profit: f64,
    /// Keyed by the date of the owning log, which can differ from the
    /// transaction's own UTC timestamp date.
    pub days: BTreeMap<NaiveDate, Vec<Transaction>>,
}

impl WeeklySummary {
    pub fn push(&mut self, day: NaiveDate, transaction: Transaction) {
        match transaction.kind {
            TransactionKind::Income => self.total_income += transaction.amount,
            TransactionKind::Expense => self.total_expenses += transaction.amount,
        }
        self.profit = self.total_income - self.total_expenses;
        self.days.entry(day).or_default().push(transaction);
    }

    /// Every transaction of the week, day by day.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.days.values().flatten()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeekdayTotals {
    pub weekday: Weekday,
    pub income: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DebtTotals {
    pub owed_to_me: f64,
    pub i_owe: f64,
    /// `owed_to_me - i_owe`
    pub net: f64,
}
