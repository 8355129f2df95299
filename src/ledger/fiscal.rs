//! Fiscal calendar helpers built on calendar quarters.
//!
//! `name_of_*` returns a label, `end_of_*` a date, `period_of_*` a [`Period`].
//! Anything that builds a date fails with `InvalidInput` outside chrono's
//! representable range.

use chrono::{Datelike, NaiveDate};

use crate::errors::LedgerError;

use super::period::Period;

const QUARTER_ENDS: [(u32, u32); 4] = [(3, 31), (6, 30), (9, 30), (12, 31)];

fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, LedgerError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        LedgerError::InvalidInput(format!(
            "{:04}-{:02}-{:02} is outside the supported calendar",
            year, month, day
        ))
    })
}

fn quarter_end(year: i32, index: usize) -> Result<NaiveDate, LedgerError> {
    let (month, day) = QUARTER_ENDS[index];
    calendar_date(year, month, day)
}

/// Zero-based quarter of `date`.
fn quarter_index(date: NaiveDate) -> usize {
    ((date.month() - 1) / 3) as usize
}

fn quarter_end_index(date: NaiveDate) -> Option<usize> {
    QUARTER_ENDS
        .iter()
        .position(|&(month, day)| date.month() == month && date.day() == day)
}

/// Start boundary (the previous quarter end) of quarter `index` in `year`.
fn quarter_start(year: i32, index: usize) -> Result<NaiveDate, LedgerError> {
    if index == 0 {
        quarter_end(year - 1, 3)
    } else {
        quarter_end(year, index - 1)
    }
}

fn years_before(date: NaiveDate, years: i32) -> Result<NaiveDate, LedgerError> {
    calendar_date(date.year() - years, date.month(), date.day())
}

/// Label of the quarter containing `date`, e.g. `Q3-2012`.
pub fn name_of_quarter(date: NaiveDate) -> String {
    format!("Q{}-{}", quarter_index(date) + 1, date.year())
}

/// Last day of the quarter containing `date`.
pub fn end_of_quarter(date: NaiveDate) -> Result<NaiveDate, LedgerError> {
    quarter_end(date.year(), quarter_index(date))
}

/// `date` itself when it is a quarter end, otherwise the latest quarter end
/// before it.
pub fn end_of_completed_quarter(date: NaiveDate) -> Result<NaiveDate, LedgerError> {
    if quarter_end_index(date).is_some() {
        return Ok(date);
    }
    quarter_start(date.year(), quarter_index(date))
}

/// The most recent quarter to complete on or before `date`.
///
/// The label takes its year from `date` rather than from the quarter itself.
pub fn period_of_preceding_quarter(date: NaiveDate) -> Result<Period, LedgerError> {
    let completed = end_of_completed_quarter(date)?;
    let index = quarter_index(completed);
    let before = quarter_start(completed.year(), index)?;
    let name = format!("Q{}-{}", index + 1, date.year());
    Ok(Period::bounded(before, completed, name))
}

/// Successive quarters starting with the one containing `from`, continuing
/// while a quarter starts before `to`. Stops early at the edge of the
/// representable calendar.
pub fn quarters(from: NaiveDate, to: NaiveDate) -> Quarters {
    Quarters {
        year: from.year(),
        index: quarter_index(from),
        to,
        started: false,
        finished: false,
    }
}

/// Iterator returned by [`quarters`].
#[derive(Debug, Clone)]
pub struct Quarters {
    year: i32,
    index: usize,
    to: NaiveDate,
    started: bool,
    finished: bool,
}

impl Quarters {
    fn current(&self) -> Option<Period> {
        let start = quarter_start(self.year, self.index).ok()?;
        let end = quarter_end(self.year, self.index).ok()?;
        Some(Period::bounded(
            start,
            end,
            format!("Q{}-{}", self.index + 1, self.year),
        ))
    }
}

impl Iterator for Quarters {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        if self.finished {
            return None;
        }
        if !self.started {
            self.started = true;
            let first = self.current();
            self.finished = first.is_none();
            return first;
        }

        self.index += 1;
        if self.index == 4 {
            self.index = 0;
            self.year += 1;
        }
        match self.current() {
            Some(period) if period.start.map_or(false, |start| start < self.to) => Some(period),
            _ => {
                self.finished = true;
                None
            }
        }
    }
}

/// Standard report periods ending on the quarter-end `date`: preceding
/// quarter, year to date (Q1-Q3 only), one/three/five years, ten years (Q4
/// only) and lifetime.
pub fn standard_periods(date: NaiveDate) -> Result<Vec<Period>, LedgerError> {
    let index = quarter_end_index(date).ok_or(LedgerError::InvalidPeriodAnchor(date))?;
    let is_year_end = index == 3;

    let mut periods = vec![period_of_preceding_quarter(date)?];
    if !is_year_end {
        periods.push(Period::bounded(
            quarter_end(date.year() - 1, 3)?,
            date,
            "Year to Date",
        ));
    }
    periods.push(Period::bounded(years_before(date, 1)?, date, "One Year"));
    periods.push(Period::bounded(years_before(date, 3)?, date, "Three Year"));
    periods.push(Period::bounded(years_before(date, 5)?, date, "Five Year"));
    if is_year_end {
        periods.push(Period::bounded(years_before(date, 10)?, date, "Ten Year"));
    }
    periods.push(Period::since_inception(date, "Lifetime"));

    Ok(periods)
}
