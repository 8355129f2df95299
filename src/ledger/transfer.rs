use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

/// Inclusive date range inside which a transfer is known to have happened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferWindow {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl TransferWindow {
    pub fn new(from: NaiveDate, until: NaiveDate) -> Result<Self, LedgerError> {
        if from > until {
            return Err(LedgerError::InvalidInput(format!(
                "transfer window starts on {} after it ends on {}",
                from, until
            )));
        }
        Ok(Self { from, until })
    }

    /// Window covering a single known day.
    pub fn exact(date: NaiveDate) -> Self {
        Self {
            from: date,
            until: date,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.from == self.until
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.from <= end && self.until >= start
    }

    /// Restricts the window to `[start, end]`, or `None` when they do not meet.
    pub fn clip(&self, start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if !self.overlaps(start, end) {
            return None;
        }
        Some(Self {
            from: self.from.max(start),
            until: self.until.min(end),
        })
    }
}

/// Directed movement of a fixed amount between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transfer {
    pub id: Uuid,
    pub source: Uuid,
    pub destination: Uuid,
    pub amount: f64,
    pub window: TransferWindow,
}

impl Transfer {
    pub fn new(source: Uuid, destination: Uuid, amount: f64, window: TransferWindow) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            destination,
            amount,
            window,
        }
    }
}

/// One account's view of a transfer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AccountFlow {
    pub transfer_id: Uuid,
    /// Positive for an inflow into the account, negative for an outflow.
    pub amount: f64,
    pub window: TransferWindow,
}

impl AccountFlow {
    pub fn is_inflow(&self) -> bool {
        self.amount > 0.0
    }
}
