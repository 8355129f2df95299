use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Named reporting range. An unset start means "since inception".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: NaiveDate,
    pub label: String,
}

impl Period {
    pub fn new(start: Option<NaiveDate>, end: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    pub fn bounded(start: NaiveDate, end: NaiveDate, label: impl Into<String>) -> Self {
        Self::new(Some(start), end, label)
    }

    pub fn since_inception(end: NaiveDate, label: impl Into<String>) -> Self {
        Self::new(None, end, label)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Some(start) => write!(f, "{} ({} – {})", self.label, start, self.end),
            None => write!(f, "{} (inception – {})", self.label, self.end),
        }
    }
}
