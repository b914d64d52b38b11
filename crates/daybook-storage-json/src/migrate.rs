//! Forward migrations applied to the raw JSON before typed decoding.

use daybook_core::CoreError;
use daybook_domain::{Settings, CURRENT_SCHEMA_VERSION};
use serde_json::{Map, Value};

/// Snapshots that predate the version field are treated as version 1.
const LEGACY_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub found_version: u8,
    pub applied: Vec<String>,
}

/// Rewrites older layouts in place and stamps the current schema version.
pub fn migrate_value(value: &mut Value) -> Result<MigrationOutcome, CoreError> {
    let root = value
        .as_object_mut()
        .ok_or_else(|| CoreError::Serde("persisted state must be a JSON object".into()))?;

    let found_version = match root.get("schemaVersion").and_then(Value::as_u64) {
        Some(raw) => u8::try_from(raw).unwrap_or(u8::MAX),
        None => LEGACY_SCHEMA_VERSION,
    };
    if found_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::UnsupportedSchema {
            found: found_version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }

    let mut applied = Vec::new();
    migrate_logs(root, &mut applied);
    migrate_transactions(root, &mut applied);
    migrate_settings(root, &mut applied)?;

    if found_version != CURRENT_SCHEMA_VERSION {
        root.insert("schemaVersion".into(), Value::from(CURRENT_SCHEMA_VERSION));
        applied.push(format!(
            "schema v{found_version} -> v{CURRENT_SCHEMA_VERSION}"
        ));
    }

    Ok(MigrationOutcome {
        found_version,
        applied,
    })
}

fn migrate_logs(root: &mut Map<String, Value>, applied: &mut Vec<String>) {
    let Some(logs) = root.get_mut("dailyLogs").and_then(Value::as_array_mut) else {
        return;
    };
    let mut renamed_totals = 0;
    let mut renamed_refs = 0;
    let mut defaulted_cash = 0;

    for log in logs.iter_mut().filter_map(Value::as_object_mut) {
        if rename_key(log, "totalSales", "totalIncome") {
            renamed_totals += 1;
        }
        if rename_key(log, "transactions", "transactionIds") {
            renamed_refs += 1;
        }
        let mut touched = false;
        for key in ["cashIncome", "cashExpenses"] {
            if !log.contains_key(key) {
                log.insert(key.into(), Value::from(0.0));
                touched = true;
            }
        }
        if touched {
            defaulted_cash += 1;
        }
    }

    if renamed_totals > 0 {
        applied.push(format!("renamed totalSales to totalIncome on {renamed_totals} log(s)"));
    }
    if renamed_refs > 0 {
        applied.push(format!("renamed transactions to transactionIds on {renamed_refs} log(s)"));
    }
    if defaulted_cash > 0 {
        applied.push(format!("defaulted cash subtotals on {defaulted_cash} log(s)"));
    }
}

fn migrate_transactions(root: &mut Map<String, Value>, applied: &mut Vec<String>) {
    let Some(transactions) = root.get_mut("transactions").and_then(Value::as_array_mut) else {
        return;
    };
    let mut renamed_dates = 0;
    let mut relabelled = 0;

    for txn in transactions.iter_mut().filter_map(Value::as_object_mut) {
        if rename_key(txn, "date", "timestamp") {
            renamed_dates += 1;
        }
        if txn.get("type").and_then(Value::as_str) == Some("sale") {
            txn.insert("type".into(), Value::from("income"));
            relabelled += 1;
        }
    }

    if renamed_dates > 0 {
        applied.push(format!("renamed date to timestamp on {renamed_dates} transaction(s)"));
    }
    if relabelled > 0 {
        applied.push(format!("relabelled {relabelled} sale transaction(s) as income"));
    }
}

fn migrate_settings(root: &mut Map<String, Value>, applied: &mut Vec<String>) -> Result<(), CoreError> {
    let defaults = serde_json::to_value(Settings::default())
        .map_err(|err| CoreError::Serde(err.to_string()))?;
    let Value::Object(defaults) = defaults else {
        return Ok(());
    };

    let settings = root
        .entry("settings")
        .or_insert_with(|| Value::Object(Map::new()));
    if !settings.is_object() {
        *settings = Value::Object(Map::new());
    }
    let Some(settings) = settings.as_object_mut() else {
        return Ok(());
    };

    let mut filled = Vec::new();
    for (key, default) in &defaults {
        match (settings.get_mut(key), default) {
            (None, _) => {
                settings.insert(key.clone(), default.clone());
                filled.push(key.clone());
            }
            (Some(Value::Object(current)), Value::Object(nested)) => {
                for (inner, value) in nested {
                    if !current.contains_key(inner) {
                        current.insert(inner.clone(), value.clone());
                        filled.push(format!("{key}.{inner}"));
                    }
                }
            }
            _ => {}
        }
    }

    if !filled.is_empty() {
        applied.push(format!("filled settings defaults: {}", filled.join(", ")));
    }
    Ok(())
}

/// Moves `from` to `to` unless `to` already exists. Returns whether it moved.
fn rename_key(object: &mut Map<String, Value>, from: &str, to: &str) -> bool {
    if object.contains_key(to) {
        return false;
    }
    match object.remove(from) {
        Some(value) => {
            object.insert(to.into(), value);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn current_snapshot_is_left_alone() {
        let mut value = json!({
            "schemaVersion": CURRENT_SCHEMA_VERSION,
            "transactions": [],
            "dailyLogs": [],
            "debts": [],
            "settings": {
                "profile": { "name": "Ada", "businessName": "Deli" },
                "currency": "EUR",
                "onboardingCompleted": true
            }
        });
        let outcome = migrate_value(&mut value).unwrap();
        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.found_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn fills_partial_profile() {
        let mut value = json!({
            "settings": { "profile": { "name": "Ada" } }
        });
        migrate_value(&mut value).unwrap();
        assert_eq!(value["settings"]["profile"]["name"], "Ada");
        assert_eq!(value["settings"]["profile"]["businessName"], "My Business");
        assert_eq!(value["settings"]["currency"], "USD");
        assert_eq!(value["settings"]["onboardingCompleted"], false);
        assert_eq!(value["schemaVersion"], CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn rejects_newer_schema() {
        let mut value = json!({ "schemaVersion": 99 });
        let err = migrate_value(&mut value).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedSchema { found: 99, .. }));
    }

    #[test]
    fn rejects_non_object_root() {
        let mut value = json!([1, 2, 3]);
        assert!(matches!(migrate_value(&mut value), Err(CoreError::Serde(_))));
    }
}
