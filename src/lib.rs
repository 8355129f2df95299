#![doc(test(attr(deny(warnings))))]

//! Bnk Core models accounts whose transfers are only known to fall inside a
//! date window, and reports a low/high bound on each account's internal rate
//! of return between two reconciled balances.

pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bnk Core tracing initialized.");
    });
}
