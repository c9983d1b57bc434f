use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Not insurable: loan-to-value of {loan_to_value_pct}% exceeds the 95% insurable maximum")]
    NotInsurable { loan_to_value_pct: Decimal },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl MortgageCalcError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        MortgageCalcError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for MortgageCalcError {
    fn from(e: serde_json::Error) -> Self {
        MortgageCalcError::SerializationError(e.to_string())
    }
}
