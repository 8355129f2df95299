use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reconciled end-of-day value of an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Balance {
    pub date: NaiveDate,
    pub value: f64,
}

impl Balance {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}
