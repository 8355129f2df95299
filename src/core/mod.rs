//! Return calculations over ledger accounts.

pub mod services;
pub mod xirr;
