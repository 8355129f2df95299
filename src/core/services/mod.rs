pub mod cash_flow_service;
pub mod irr_service;
pub mod report_service;

pub use cash_flow_service::{CashFlowService, WindowExtract, WindowedCashFlow};
pub use irr_service::{IrrService, TimingScenario};
pub use report_service::{PeriodReturn, ReportService};

use chrono::NaiveDate;

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("No reconciled balance for `{account}` on {date}")]
    MissingBoundaryBalance { account: String, date: NaiveDate },
    #[error("Rate of return is undefined: {0}")]
    DegenerateWindow(String),
    #[error("IRR did not converge after {iterations} iterations (residual NPV {residual})")]
    IrrDidNotConverge { iterations: u32, residual: f64 },
}
