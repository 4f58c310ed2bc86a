use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinPlanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl FinPlanError {
    /// Shorthand for the common validation failure.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        FinPlanError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// A figure derived from `field` left the Decimal range.
    pub fn out_of_range(field: &str) -> Self {
        Self::invalid(field, "computed amount exceeds decimal range")
    }
}

impl From<serde_json::Error> for FinPlanError {
    fn from(e: serde_json::Error) -> Self {
        FinPlanError::SerializationError(e.to_string())
    }
}
