//! Ledger domain models and fiscal calendar helpers.

pub mod account;
pub mod balance;
pub mod fiscal;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;
pub mod transfer;

pub use account::{Account, AccountState};
pub use balance::Balance;
pub use fiscal::{
    end_of_completed_quarter, end_of_quarter, name_of_quarter, period_of_preceding_quarter,
    quarters, standard_periods, Quarters,
};
pub use ledger::Ledger;
pub use period::Period;
pub use transfer::{AccountFlow, Transfer, TransferWindow};
