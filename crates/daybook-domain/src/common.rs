//! Shared traits and small helper types for bookkeeping primitives.

use std::fmt;

use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the app state.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Multiplies every stored monetary field by `rate`.
///
/// Used when the active currency changes; amounts are stored in the active
/// currency, never in a fixed base.
pub trait Rescale {
    fn rescale(&mut self, rate: f64);
}

/// Returned when a textual label does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseLabelError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for ParseLabelError {}
