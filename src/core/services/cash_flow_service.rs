use chrono::NaiveDate;

use crate::ledger::Account;

use super::{ServiceError, ServiceResult};

/// A signed flow whose date is only known to lie in `[from, until]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowedCashFlow {
    /// Positive for money entering the account, negative for money leaving.
    pub amount: f64,
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl WindowedCashFlow {
    pub fn new(amount: f64, from: NaiveDate, until: NaiveDate) -> Self {
        Self {
            amount,
            from,
            until,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.from == self.until
    }
}

/// Boundary values and flows of one account over a query window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowExtract {
    pub opening: f64,
    pub closing: f64,
    pub flows: Vec<WindowedCashFlow>,
}

pub struct CashFlowService;

impl CashFlowService {
    /// Collects the opening and closing checkpoints at `start` and `end` and
    /// every flow that may have happened after the opening snapshot.
    ///
    /// Balances are end-of-day values, so a flow that surely happened on or
    /// before `start` is already part of the opening value. Remaining windows
    /// are clipped to `[start + 1 day, end]`. Overlapping windows are kept
    /// as separate flows.
    pub fn extract(
        account: &Account,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<WindowExtract> {
        if start >= end {
            return Err(ServiceError::DegenerateWindow(format!(
                "window {} to {} has no length",
                start, end
            )));
        }

        let opening = Self::boundary_balance(account, start)?;
        let closing = Self::boundary_balance(account, end)?;

        let first_day = start.succ_opt().unwrap_or(end);
        let mut flows: Vec<WindowedCashFlow> = account
            .flows()
            .iter()
            .filter_map(|flow| {
                let window = flow.window.clip(first_day, end)?;
                Some(WindowedCashFlow::new(flow.amount, window.from, window.until))
            })
            .collect();
        flows.sort_by_key(|flow| (flow.from, flow.until));

        tracing::debug!(
            account = %account.name,
            %start,
            %end,
            opening,
            closing,
            flows = flows.len(),
            "extracted window"
        );

        Ok(WindowExtract {
            opening,
            closing,
            flows,
        })
    }

    fn boundary_balance(account: &Account, date: NaiveDate) -> ServiceResult<f64> {
        account
            .balance_on(date)
            .ok_or_else(|| ServiceError::MissingBoundaryBalance {
                account: account.name.clone(),
                date,
            })
    }
}
