//! CSV views of recorded account activity and computed reports.

use std::io;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::services::PeriodReturn;
use crate::errors::LedgerError;
use crate::ledger::Account;

#[derive(Debug, Serialize)]
struct ActivityRow {
    date: NaiveDate,
    kind: &'static str,
    amount: f64,
    until: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    period: &'a str,
    start: Option<NaiveDate>,
    end: NaiveDate,
    low: Option<f64>,
    high: Option<f64>,
    note: Option<&'a str>,
}

/// Writes every balance and flow of `account` in date order. Flows are dated
/// by the start of their window, carry the window end in `until` and are
/// tagged `inflow` or `outflow`.
pub fn write_account_csv<W: io::Write>(account: &Account, writer: W) -> Result<(), LedgerError> {
    let mut rows: Vec<ActivityRow> = account
        .balances()
        .iter()
        .map(|balance| ActivityRow {
            date: balance.date,
            kind: "balance",
            amount: balance.value,
            until: None,
        })
        .chain(account.flows().iter().map(|flow| ActivityRow {
            date: flow.window.from,
            kind: if flow.is_inflow() { "inflow" } else { "outflow" },
            amount: flow.amount,
            until: Some(flow.window.until),
        }))
        .collect();
    rows.sort_by_key(|row| row.date);

    let mut csv = csv::Writer::from_writer(writer);
    for row in &rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_report_csv<W: io::Write>(rows: &[PeriodReturn], writer: W) -> Result<(), LedgerError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(ReportRow {
            period: &row.period.label,
            start: row.start,
            end: row.period.end,
            low: row.bounds.map(|(low, _)| low),
            high: row.bounds.map(|(_, high)| high),
            note: row.note.as_deref(),
        })?;
    }
    csv.flush()?;
    Ok(())
}
