#![allow(dead_code)]

use bnk_core::ledger::{Account, Ledger, TransferWindow};
use chrono::NaiveDate;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Rounds both bounds to `places` decimals, the way reference values are quoted.
pub fn rounded(bounds: (f64, f64), places: i32) -> (f64, f64) {
    let scale = 10f64.powi(places);
    (
        (bounds.0 * scale).round() / scale,
        (bounds.1 * scale).round() / scale,
    )
}

/// Fluent fixture builder addressing accounts by name.
pub struct LedgerBuilder {
    ledger: Ledger,
}

impl LedgerBuilder {
    pub fn new() -> Self {
        Self {
            ledger: Ledger::new("fixture"),
        }
    }

    pub fn open(mut self, name: &str, on: NaiveDate) -> Self {
        self.ledger.open_account(name, on).expect("open account");
        self
    }

    pub fn balance(mut self, name: &str, on: NaiveDate, value: f64) -> Self {
        let id = self.id(name);
        self.ledger
            .record_balance(id, on, value)
            .expect("record balance");
        self
    }

    pub fn transfer(
        mut self,
        source: &str,
        destination: &str,
        amount: f64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Self {
        let (source, destination) = (self.id(source), self.id(destination));
        let window = TransferWindow::new(from, until).expect("transfer window");
        self.ledger
            .record_transfer(source, destination, amount, window)
            .expect("record transfer");
        self
    }

    pub fn close(mut self, name: &str, on: NaiveDate) -> Self {
        let id = self.id(name);
        self.ledger.close_account(id, on).expect("close account");
        self
    }

    pub fn build(self) -> Ledger {
        self.ledger
    }

    fn id(&self, name: &str) -> uuid::Uuid {
        self.ledger
            .account_by_name(name)
            .unwrap_or_else(|| panic!("unknown account `{}`", name))
            .id
    }
}

pub fn account<'a>(ledger: &'a Ledger, name: &str) -> &'a Account {
    ledger.account_by_name(name).expect("account exists")
}

/// Two accounts `a` and `b` opened on 2000-12-30 with zero balances on
/// 2000-12-31.
pub fn pair_from_2000() -> LedgerBuilder {
    LedgerBuilder::new()
        .open("a", date(2000, 12, 30))
        .open("b", date(2000, 12, 30))
        .balance("a", date(2000, 12, 31), 0.0)
        .balance("b", date(2000, 12, 31), 0.0)
}

/// Account `a` holding 100000 on 2009-12-31, funded from `Assets`.
pub fn funded_from_2009() -> LedgerBuilder {
    LedgerBuilder::new()
        .open("a", date(2009, 12, 30))
        .open("Assets", date(2000, 12, 30))
        .balance("a", date(2009, 12, 31), 100_000.0)
}
