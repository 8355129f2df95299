use std::{
    fs::{self, File},
    path::PathBuf,
};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Config, ReportConfig, SolverConfig};
use crate::errors::LedgerError;
use crate::export;
use crate::ledger::{standard_periods, Account, Period};

use super::{ServiceError, ServiceResult};

/// Return bounds of one account over one reporting period.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReturn {
    pub period: Period,
    /// Start actually used; a lifetime period resolves to the first balance.
    pub start: Option<NaiveDate>,
    pub bounds: Option<(f64, f64)>,
    /// Why `bounds` is missing.
    pub note: Option<String>,
}

pub struct ReportService;

impl ReportService {
    /// Bounded IRR for every standard period ending on the quarter-end `anchor`.
    ///
    /// Periods the account cannot answer (no reconciled balance on a boundary,
    /// or nothing to annualize) are kept with a note instead of bounds. Solver
    /// failures abort the whole report.
    pub fn standard_report(
        account: &Account,
        anchor: NaiveDate,
        config: &Config,
    ) -> ServiceResult<Vec<PeriodReturn>> {
        let rows = standard_periods(anchor)?
            .into_iter()
            .map(|period| Self::period_return(account, period, &config.solver))
            .collect::<ServiceResult<Vec<_>>>()?;

        if config.report.write_csv {
            Self::write_csv(account, anchor, &rows, &config.report)?;
        }
        Ok(rows)
    }

    pub fn period_return(
        account: &Account,
        period: Period,
        solver: &SolverConfig,
    ) -> ServiceResult<PeriodReturn> {
        let Some(start) = period.start.or_else(|| account.first_balance_date()) else {
            return Ok(Self::skipped(
                account,
                period,
                None,
                "account has no balances".into(),
            ));
        };

        match account.get_irr_with(start, period.end, solver) {
            Ok(bounds) => Ok(PeriodReturn {
                period,
                start: Some(start),
                bounds: Some(bounds),
                note: None,
            }),
            Err(
                err @ (ServiceError::MissingBoundaryBalance { .. }
                | ServiceError::DegenerateWindow(_)),
            ) => Ok(Self::skipped(account, period, Some(start), err.to_string())),
            Err(err) => Err(err),
        }
    }

    /// Writes `rows` to `<output_dir>/<account>-<anchor>.csv` and returns the path.
    pub fn write_csv(
        account: &Account,
        anchor: NaiveDate,
        rows: &[PeriodReturn],
        report: &ReportConfig,
    ) -> ServiceResult<PathBuf> {
        let dir = report.output_dir();
        fs::create_dir_all(&dir).map_err(LedgerError::from)?;
        let path = dir.join(format!("{}-{}.csv", file_stem(&account.name), anchor));
        let file = File::create(&path).map_err(LedgerError::from)?;
        export::write_report_csv(rows, file)?;
        info!(path = %path.display(), "wrote report");
        Ok(path)
    }

    fn skipped(
        account: &Account,
        period: Period,
        start: Option<NaiveDate>,
        note: String,
    ) -> PeriodReturn {
        warn!(account = %account.name, period = %period, "{}", note);
        PeriodReturn {
            period,
            start,
            bounds: None,
            note: Some(note),
        }
    }
}

fn file_stem(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
