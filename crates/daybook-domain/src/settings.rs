use serde::{Deserialize, Serialize};

use crate::currency::CurrencyCode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub business_name: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "User".into(),
            business_name: "My Business".into(),
        }
    }
}

/// Process-wide preferences. Missing fields in older snapshots fall back to
/// the initial values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub profile: Profile,
    pub currency: CurrencyCode,
    pub onboarding_completed: bool,
}

impl Settings {
    /// Shallow merge: a present `profile` replaces the whole profile.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            profile: patch
                .profile
                .clone()
                .unwrap_or_else(|| self.profile.clone()),
            currency: patch
                .currency
                .clone()
                .unwrap_or_else(|| self.currency.clone()),
            onboarding_completed: patch
                .onboarding_completed
                .unwrap_or(self.onboarding_completed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub profile: Option<Profile>,
    pub currency: Option<CurrencyCode>,
    pub onboarding_completed: Option<bool>,
}

impl SettingsPatch {
    pub fn currency(code: impl Into<CurrencyCode>) -> Self {
        Self {
            currency: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn profile(name: impl Into<String>, business_name: impl Into<String>) -> Self {
        Self {
            profile: Some(Profile {
                name: name.into(),
                business_name: business_name.into(),
            }),
            ..Self::default()
        }
    }
}
