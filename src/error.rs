//! Error types for validation and input loading
//!
//! The amortization engine itself never fails. Errors only arise at the
//! boundary: validating user-supplied loan terms, looking up loans, and
//! reading input files.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown loan: {0}")]
    UnknownLoan(String),

    #[error("Unknown prepayment scenario: {0}")]
    UnknownScenario(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoanError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
