use std::{cmp::Ordering, collections::HashSet};

use daybook_domain::AppState;
use strsim::jaro_winkler;

/// Minimum similarity for a past description to be offered.
pub const SUGGESTION_THRESHOLD: f64 = 0.7;
const MIN_INPUT_CHARS: usize = 3;

/// Offers past transaction descriptions resembling partially typed input.
pub struct SuggestionService;

impl SuggestionService {
    /// Prefix matches rank first, then by Jaro-Winkler similarity. Exact
    /// matches are not suggested.
    pub fn suggest(state: &AppState, input: &str, limit: usize) -> Vec<String> {
        let needle = input.trim().to_lowercase();
        if needle.chars().count() < MIN_INPUT_CHARS || limit == 0 {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut ranked: Vec<(bool, f64, &str)> = state
            .transactions
            .iter()
            .map(|txn| txn.description.trim())
            .filter(|desc| !desc.is_empty())
            .filter(|desc| seen.insert(desc.to_lowercase()))
            .filter_map(|desc| {
                let candidate = desc.to_lowercase();
                if candidate == needle {
                    return None;
                }
                let prefix = candidate.starts_with(&needle);
                let score = jaro_winkler(&needle, &candidate);
                (prefix || score >= SUGGESTION_THRESHOLD).then_some((prefix, score, desc))
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
                .then_with(|| a.2.cmp(b.2))
        });
        ranked
            .into_iter()
            .take(limit)
            .map(|(_, _, desc)| desc.to_string())
            .collect()
    }
}
