//! Domain models for individual money movements.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        payment_method: PaymentMethod,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            kind,
            amount,
            payment_method,
            description: description.into(),
        }
    }

    /// Returns a copy with every present field of `patch` applied. Identity and
    /// timestamp never change.
    pub fn patched(&self, patch: &TransactionPatch) -> Self {
        Self {
            id: self.id,
            timestamp: self.timestamp,
            kind: patch.kind.unwrap_or(self.kind),
            amount: patch.amount.unwrap_or(self.amount),
            payment_method: patch.payment_method.unwrap_or(self.payment_method),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Rescale for Transaction {
    fn rescale(&mut self, rate: f64) {
        self.amount *= rate;
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Direction of a money movement. Older snapshots label income as `sale`.
pub enum TransactionKind {
    #[serde(alias = "sale")]
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.pad(label)
    }
}

impl FromStr for TransactionKind {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "sale" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(ParseLabelError::new("transaction type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    /// Only cash movements change the cash-on-hand subtotals of a day.
    pub fn is_cash(self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        };
        f.pad(label)
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(ParseLabelError::new("payment method", other)),
        }
    }
}

/// Input for recording a new transaction; id and timestamp are assigned on entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub description: String,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        payment_method: PaymentMethod,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            amount,
            payment_method,
            description: description.into(),
        }
    }

    pub fn income(
        amount: f64,
        payment_method: PaymentMethod,
        description: impl Into<String>,
    ) -> Self {
        Self::new(TransactionKind::Income, amount, payment_method, description)
    }

    pub fn expense(
        amount: f64,
        payment_method: PaymentMethod,
        description: impl Into<String>,
    ) -> Self {
        Self::new(TransactionKind::Expense, amount, payment_method, description)
    }
}

/// Changeset for an existing transaction. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub kind: Option<TransactionKind>,
    pub amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub description: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.payment_method.is_none()
            && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_sale_label_reads_as_income() {
        let kind: TransactionKind = serde_json::from_str("\"sale\"").unwrap();
        assert_eq!(kind, TransactionKind::Income);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"income\"");
    }

    #[test]
    fn patch_keeps_identity_and_timestamp() {
        let original = Transaction::new(
            TransactionKind::Expense,
            12.0,
            PaymentMethod::Card,
            "Paper",
            Utc::now(),
        );
        let patch = TransactionPatch {
            kind: Some(TransactionKind::Income),
            payment_method: Some(PaymentMethod::Cash),
            ..TransactionPatch::default()
        };
        let patched = original.patched(&patch);
        assert_eq!(patched.id, original.id);
        assert_eq!(patched.timestamp, original.timestamp);
        assert_eq!(patched.kind, TransactionKind::Income);
        assert_eq!(patched.payment_method, PaymentMethod::Cash);
        assert_eq!(patched.amount, 12.0);
        assert_eq!(patched.description, "Paper");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let txn = Transaction::new(
            TransactionKind::Income,
            5.0,
            PaymentMethod::Transfer,
            "Invoice",
            Utc::now(),
        );
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["paymentMethod"], "transfer");
        assert!(json.get("timestamp").is_some());
    }
}
