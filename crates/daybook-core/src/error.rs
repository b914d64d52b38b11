use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No active day. Start the day before recording transactions.")]
    NoActiveDay,
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("state schema v{found} is newer than supported v{supported}")]
    UnsupportedSchema { found: u8, supported: u8 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn ensure_positive_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::Validation(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::Validation(format!(
            "amount must be zero or positive, got {amount}"
        )));
    }
    Ok(())
}
