use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

use super::{
    account::Account,
    transfer::{AccountFlow, Transfer, TransferWindow},
};

/// Owns every account and the transfers recorded between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub name: String,
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    transfers: Vec<Transfer>,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accounts: Vec::new(),
            transfers: Vec::new(),
        }
    }

    pub fn open_account(
        &mut self,
        name: impl Into<String>,
        opened_on: NaiveDate,
    ) -> Result<Uuid, LedgerError> {
        let name = name.into();
        self.validate_name(&name)?;
        let account = Account::open(name, opened_on);
        let id = account.id;
        tracing::debug!(account = %account.name, %opened_on, "opened account");
        self.accounts.push(account);
        Ok(id)
    }

    pub fn close_account(&mut self, id: Uuid, date: NaiveDate) -> Result<(), LedgerError> {
        self.account_mut(id)?.close(date)
    }

    pub fn record_balance(
        &mut self,
        id: Uuid,
        date: NaiveDate,
        value: f64,
    ) -> Result<(), LedgerError> {
        self.account_mut(id)?.record_balance(date, value)
    }

    /// Records a transfer and mirrors it onto both accounts as signed flows.
    pub fn record_transfer(
        &mut self,
        source: Uuid,
        destination: Uuid,
        amount: f64,
        window: TransferWindow,
    ) -> Result<Uuid, LedgerError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidInput(format!(
                "transfer amount must be a non-negative number, got {}",
                amount
            )));
        }
        if source == destination {
            return Err(LedgerError::InvalidInput(
                "transfer source and destination must differ".into(),
            ));
        }
        // Both sides are checked before either is touched.
        for id in [source, destination] {
            let account = self.account_or_err(id)?;
            account.ensure_open_on(window.from)?;
            account.ensure_open_on(window.until)?;
        }

        let transfer = Transfer::new(source, destination, amount, window);
        let transfer_id = transfer.id;
        self.account_mut(source)?.record_flow(AccountFlow {
            transfer_id,
            amount: -amount,
            window,
        })?;
        self.account_mut(destination)?.record_flow(AccountFlow {
            transfer_id,
            amount,
            window,
        })?;
        self.transfers.push(transfer);
        Ok(transfer_id)
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn account_by_name(&self, name: &str) -> Option<&Account> {
        let normalized = name.trim().to_ascii_lowercase();
        self.accounts
            .iter()
            .find(|account| account.name.trim().to_ascii_lowercase() == normalized)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    fn account_or_err(&self, id: Uuid) -> Result<&Account, LedgerError> {
        self.account(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))
    }

    fn account_mut(&mut self, id: Uuid) -> Result<&mut Account, LedgerError> {
        self.accounts
            .iter_mut()
            .find(|account| account.id == id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))
    }

    fn validate_name(&self, candidate: &str) -> Result<(), LedgerError> {
        if candidate.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                "account name cannot be empty".into(),
            ));
        }
        if self.account_by_name(candidate).is_some() {
            Err(LedgerError::InvalidInput(format!(
                "Account `{}` already exists",
                candidate
            )))
        } else {
            Ok(())
        }
    }
}
