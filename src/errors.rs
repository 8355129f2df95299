use chrono::NaiveDate;
use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Account `{account}` is not open on {date}")]
    AccountClosed { account: String, date: NaiveDate },
    #[error("Reports need a quarter-end anchor date, got {0}")]
    InvalidPeriodAnchor(NaiveDate),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
