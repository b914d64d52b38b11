use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use daybook_domain::AppState;
use uuid::Uuid;

use crate::CoreError;

/// Outcome of loading a persisted snapshot.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub state: AppState,
    /// Human-readable descriptions of the forward migrations that ran.
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
    /// Schema version found on disk, before migration.
    pub schema_version: u8,
}

/// Abstraction over the single persisted slot holding the app state.
pub trait StateStorage: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<LoadReport>, CoreError>;
    fn save(&self, state: &AppState) -> Result<(), CoreError>;
}

/// Detects reference anomalies between logs and transactions.
pub fn state_warnings(state: &AppState) -> Vec<String> {
    let known: HashSet<Uuid> = state.transactions.iter().map(|txn| txn.id).collect();
    let mut owners: HashMap<Uuid, usize> = HashMap::new();
    let mut warnings = Vec::new();

    for log in &state.daily_logs {
        for id in &log.transaction_ids {
            if known.contains(id) {
                *owners.entry(*id).or_default() += 1;
            } else {
                warnings.push(format!("log {} references unknown transaction {}", log.id, id));
            }
        }
    }
    for txn in &state.transactions {
        match owners.get(&txn.id).copied().unwrap_or(0) {
            0 => warnings.push(format!("transaction {} is not owned by any log", txn.id)),
            1 => {}
            count => warnings.push(format!("transaction {} is owned by {} logs", txn.id, count)),
        }
    }

    let open: Vec<String> = state
        .daily_logs
        .iter()
        .filter(|log| log.is_open())
        .map(|log| log.id.to_string())
        .collect();
    if open.len() > 1 {
        warnings.push(format!("multiple open logs: {}", open.join(", ")));
    }
    warnings
}

/// Keeps the last saved snapshot in memory. Used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStateStorage {
    slot: Mutex<Option<AppState>>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            slot: Mutex::new(Some(state)),
        }
    }

    pub fn snapshot(&self) -> Option<AppState> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl StateStorage for MemoryStateStorage {
    fn load(&self) -> Result<Option<LoadReport>, CoreError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| CoreError::Storage("memory slot poisoned".into()))?;
        Ok(slot.clone().map(|state| LoadReport {
            warnings: state_warnings(&state),
            schema_version: state.schema_version,
            migrations: Vec::new(),
            state,
        }))
    }

    fn save(&self, state: &AppState) -> Result<(), CoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| CoreError::Storage("memory slot poisoned".into()))?;
        *slot = Some(state.clone());
        Ok(())
    }
}
