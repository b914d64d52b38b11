//! Static exchange-rate lookup used when the active currency changes.

use std::collections::BTreeMap;

use daybook_domain::CurrencyCode;
use tracing::warn;

/// Resolves a multiplicative rate converting amounts in `from` into `to`.
pub trait RateProvider: Send + Sync {
    /// Returns 1.0 when either code is unknown.
    fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> f64;
}

/// Units of each currency per US dollar.
const DEFAULT_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("NGN", 1485.0),
    ("JPY", 157.0),
    ("CAD", 1.37),
    ("AUD", 1.5),
    ("CHF", 0.9),
    ("CNY", 7.25),
    ("INR", 83.5),
];

/// Fixed table of per-USD rates. Conversions go through the dollar.
#[derive(Debug, Clone)]
pub struct StaticRateTable {
    per_usd: BTreeMap<CurrencyCode, f64>,
}

impl StaticRateTable {
    pub fn new() -> Self {
        Self::from_rates(DEFAULT_RATES.iter().copied())
    }

    pub fn from_rates<'a>(rates: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let per_usd = rates
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .map(|(code, rate)| (CurrencyCode::new(code), rate))
            .collect();
        Self { per_usd }
    }

    pub fn supported_codes(&self) -> Vec<CurrencyCode> {
        self.per_usd.keys().cloned().collect()
    }

    pub fn supports(&self, code: &CurrencyCode) -> bool {
        self.per_usd.contains_key(code)
    }
}

impl Default for StaticRateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RateProvider for StaticRateTable {
    fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> f64 {
        if from == to {
            return 1.0;
        }
        match (self.per_usd.get(from), self.per_usd.get(to)) {
            (Some(from_rate), Some(to_rate)) => to_rate / from_rate,
            _ => {
                warn!(from = %from, to = %to, "exchange rate not found; using 1.0");
                1.0
            }
        }
    }
}
