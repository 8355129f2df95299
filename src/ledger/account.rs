use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SolverConfig;
use crate::core::services::{IrrService, ServiceResult};
use crate::errors::LedgerError;

use super::{balance::Balance, transfer::AccountFlow};

/// Lifecycle of an account. `Closed` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountState {
    Open,
    Closed,
}

/// An account with its own date-ordered balance checkpoints and the signed
/// view of every transfer that touches it, ordered by window start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub opened_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_on: Option<NaiveDate>,
    #[serde(default)]
    balances: Vec<Balance>,
    #[serde(default)]
    flows: Vec<AccountFlow>,
}

impl Account {
    /// Creates an account that is open from `opened_on` onwards.
    pub fn open(name: impl Into<String>, opened_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            opened_on,
            closed_on: None,
            balances: Vec::new(),
            flows: Vec::new(),
        }
    }

    pub fn state(&self) -> AccountState {
        if self.closed_on.is_some() {
            AccountState::Closed
        } else {
            AccountState::Open
        }
    }

    /// Whether `date` falls inside `[opened_on, closed_on]`.
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        date >= self.opened_on && self.closed_on.map_or(true, |closed| date <= closed)
    }

    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    pub fn flows(&self) -> &[AccountFlow] {
        &self.flows
    }

    pub fn balance_on(&self, date: NaiveDate) -> Option<f64> {
        self.balances
            .binary_search_by_key(&date, |balance| balance.date)
            .ok()
            .map(|idx| self.balances[idx].value)
    }

    pub fn first_balance_date(&self) -> Option<NaiveDate> {
        self.balances.first().map(|balance| balance.date)
    }

    /// Latest date any recorded event refers to.
    pub fn last_activity(&self) -> Option<NaiveDate> {
        let last_balance = self.balances.last().map(|balance| balance.date);
        let last_flow = self.flows.iter().map(|flow| flow.window.until).max();
        last_balance.max(last_flow)
    }

    pub fn record_balance(&mut self, date: NaiveDate, value: f64) -> Result<(), LedgerError> {
        self.ensure_open_on(date)?;
        if !value.is_finite() {
            return Err(LedgerError::InvalidInput(format!(
                "balance for `{}` on {} is not a finite number",
                self.name, date
            )));
        }
        match self
            .balances
            .binary_search_by_key(&date, |balance| balance.date)
        {
            Ok(_) => Err(LedgerError::InvalidInput(format!(
                "account `{}` already has a balance on {}",
                self.name, date
            ))),
            Err(idx) => {
                self.balances.insert(idx, Balance::new(date, value));
                Ok(())
            }
        }
    }

    /// Moves the account to `Closed`. The close date is the last day the
    /// account accepts events.
    pub fn close(&mut self, date: NaiveDate) -> Result<(), LedgerError> {
        if let Some(closed) = self.closed_on {
            return Err(LedgerError::AccountClosed {
                account: self.name.clone(),
                date: closed,
            });
        }
        if date < self.opened_on {
            return Err(LedgerError::InvalidInput(format!(
                "account `{}` cannot close on {} before opening on {}",
                self.name, date, self.opened_on
            )));
        }
        if let Some(last) = self.last_activity() {
            if date < last {
                return Err(LedgerError::InvalidInput(format!(
                    "account `{}` cannot close on {} with activity recorded on {}",
                    self.name, date, last
                )));
            }
        }
        self.closed_on = Some(date);
        Ok(())
    }

    pub(crate) fn record_flow(&mut self, flow: AccountFlow) -> Result<(), LedgerError> {
        self.ensure_open_on(flow.window.from)?;
        self.ensure_open_on(flow.window.until)?;
        let idx = self
            .flows
            .partition_point(|existing| existing.window.from <= flow.window.from);
        self.flows.insert(idx, flow);
        Ok(())
    }

    pub(crate) fn ensure_open_on(&self, date: NaiveDate) -> Result<(), LedgerError> {
        if self.is_open_on(date) {
            Ok(())
        } else {
            Err(LedgerError::AccountClosed {
                account: self.name.clone(),
                date,
            })
        }
    }

    /// Bounded IRR between two reconciled balances, as `(low, high)` percentages.
    pub fn get_irr(&self, start: NaiveDate, end: NaiveDate) -> ServiceResult<(f64, f64)> {
        self.get_irr_with(start, end, &SolverConfig::default())
    }

    pub fn get_irr_with(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        config: &SolverConfig,
    ) -> ServiceResult<(f64, f64)> {
        IrrService::account_irr(self, start, end, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::transfer::TransferWindow;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn balances_stay_sorted_and_unique() {
        let mut account = Account::open("a", date(2020, 1, 1));
        account.record_balance(date(2020, 6, 30), 20.0).unwrap();
        account.record_balance(date(2020, 3, 31), 10.0).unwrap();
        let dates: Vec<_> = account.balances().iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![date(2020, 3, 31), date(2020, 6, 30)]);
        assert_eq!(account.balance_on(date(2020, 3, 31)), Some(10.0));
        assert_eq!(account.balance_on(date(2020, 4, 1)), None);

        let err = account.record_balance(date(2020, 3, 31), 11.0).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[test]
    fn closing_is_terminal_and_inclusive() {
        let mut account = Account::open("a", date(2020, 1, 1));
        account.record_balance(date(2020, 12, 31), 5.0).unwrap();
        assert_eq!(account.state(), AccountState::Open);

        assert!(account.close(date(2020, 12, 30)).is_err());
        account.close(date(2021, 1, 2)).unwrap();
        assert_eq!(account.state(), AccountState::Closed);
        assert!(account.is_open_on(date(2021, 1, 2)));
        assert!(!account.is_open_on(date(2021, 1, 3)));

        let err = account.record_balance(date(2021, 1, 3), 0.0).unwrap_err();
        assert!(matches!(err, LedgerError::AccountClosed { .. }));
        let err = account.close(date(2021, 2, 1)).unwrap_err();
        assert!(matches!(err, LedgerError::AccountClosed { .. }));
    }

    #[test]
    fn events_before_opening_are_rejected() {
        let mut account = Account::open("a", date(2020, 1, 1));
        let err = account.record_balance(date(2019, 12, 31), 1.0).unwrap_err();
        assert!(matches!(err, LedgerError::AccountClosed { .. }));

        let flow = AccountFlow {
            transfer_id: Uuid::new_v4(),
            amount: 10.0,
            window: TransferWindow::new(date(2019, 12, 1), date(2020, 1, 5)).unwrap(),
        };
        assert!(account.record_flow(flow).is_err());
        assert!(account.flows().is_empty());
    }

    #[test]
    fn close_respects_last_flow_window() {
        let mut account = Account::open("a", date(2020, 1, 1));
        let flow = AccountFlow {
            transfer_id: Uuid::new_v4(),
            amount: -10.0,
            window: TransferWindow::new(date(2020, 2, 1), date(2020, 3, 1)).unwrap(),
        };
        account.record_flow(flow).unwrap();
        assert!(account.close(date(2020, 2, 15)).is_err());
        assert!(account.close(date(2020, 3, 1)).is_ok());
    }
}
