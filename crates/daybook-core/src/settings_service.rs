use daybook_domain::{AppState, Rescale, SettingsPatch};
use tracing::info;

use crate::rates::RateProvider;

pub struct SettingsService;

impl SettingsService {
    /// Merges `patch` into the settings. A currency change rescales every
    /// stored amount in the same snapshot.
    pub fn update(state: &AppState, rates: &dyn RateProvider, patch: &SettingsPatch) -> AppState {
        let mut next = state.clone();
        let previous = state.settings.currency.clone();
        next.settings = state.settings.merged(patch);

        if next.settings.currency != previous {
            let rate = rates.rate(&previous, &next.settings.currency);
            if rate != 1.0 {
                rescale_all(&mut next, rate);
            }
            info!(
                from = %previous,
                to = %next.settings.currency,
                rate,
                "currency changed"
            );
        }
        next
    }

    /// Back to the initial state, keeping only the user's profile.
    pub fn reset(state: &AppState) -> AppState {
        let mut next = AppState::initial();
        next.settings.profile = state.settings.profile.clone();
        info!("data reset");
        next
    }
}

fn rescale_all(state: &mut AppState, rate: f64) {
    state.transactions.iter_mut().for_each(|txn| txn.rescale(rate));
    state.daily_logs.iter_mut().for_each(|log| log.rescale(rate));
    state.debts.iter_mut().for_each(|debt| debt.rescale(rate));
}
