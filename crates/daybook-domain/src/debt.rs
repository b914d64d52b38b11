use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A receivable or payable tracked outside of the daily ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: Uuid,
    pub contact_name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: DebtKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl Debt {
    pub fn new(new: NewDebt, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact_name: new.contact_name,
            amount: new.amount,
            kind: new.kind,
            notes: new.notes,
            last_updated: now,
        }
    }
}

impl Identifiable for Debt {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Rescale for Debt {
    fn rescale(&mut self, rate: f64) {
        self.amount *= rate;
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    OwedToMe,
    IOwe,
}

impl fmt::Display for DebtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DebtKind::OwedToMe => "owed_to_me",
            DebtKind::IOwe => "i_owe",
        };
        f.pad(label)
    }
}

impl FromStr for DebtKind {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "owed_to_me" | "owed-to-me" => Ok(DebtKind::OwedToMe),
            "i_owe" | "i-owe" => Ok(DebtKind::IOwe),
            other => Err(ParseLabelError::new("debt type", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDebt {
    pub contact_name: String,
    pub amount: f64,
    pub kind: DebtKind,
    pub notes: Option<String>,
}

impl NewDebt {
    pub fn new(contact_name: impl Into<String>, amount: f64, kind: DebtKind) -> Self {
        Self {
            contact_name: contact_name.into(),
            amount,
            kind,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Changeset for an existing debt. `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtPatch {
    pub contact_name: Option<String>,
    pub amount: Option<f64>,
    pub kind: Option<DebtKind>,
    pub notes: Option<Option<String>>,
}

impl DebtPatch {
    pub fn apply_to(&self, debt: &mut Debt) {
        if let Some(name) = &self.contact_name {
            debt.contact_name = name.clone();
        }
        if let Some(amount) = self.amount {
            debt.amount = amount;
        }
        if let Some(kind) = self.kind {
            debt.kind = kind;
        }
        if let Some(notes) = &self.notes {
            debt.notes = notes.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_kinds_use_snake_case_labels() {
        assert_eq!(
            serde_json::to_string(&DebtKind::OwedToMe).unwrap(),
            "\"owed_to_me\""
        );
        assert_eq!(serde_json::to_string(&DebtKind::IOwe).unwrap(), "\"i_owe\"");
        assert_eq!("i_owe".parse::<DebtKind>().unwrap(), DebtKind::IOwe);
    }
}
