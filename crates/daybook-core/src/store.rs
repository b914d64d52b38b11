use std::sync::Arc;

use daybook_domain::AppState;

/// Holds the current snapshot. Readers get a shared handle to an immutable
/// state; writers publish a complete replacement.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    state: Arc<AppState>,
}

impl EntityStore {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn get_state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    pub fn replace(&mut self, next: AppState) {
        self.state = Arc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybook_domain::SettingsPatch;

    #[test]
    fn earlier_snapshots_survive_replacement() {
        let mut store = EntityStore::new(AppState::initial());
        let before = store.get_state();

        let mut next = (*before).clone();
        next.settings = next.settings.merged(&SettingsPatch::profile("Ada", "Ada's Deli"));
        store.replace(next);

        assert_eq!(before.settings.profile.name, "User");
        assert_eq!(store.get_state().settings.profile.name, "Ada");
    }
}
