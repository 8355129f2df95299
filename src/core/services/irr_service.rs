use chrono::NaiveDate;
use tracing::debug;

use crate::config::SolverConfig;
use crate::core::xirr::{xirr, CashFlow};
use crate::ledger::Account;

use super::{CashFlowService, ServiceError, ServiceResult, WindowedCashFlow};

/// Placement of every windowed flow at one edge of its window.
///
/// Each NPV term is monotonic in its own date, so the extreme rates come from
/// edge placements only. With a positive rate, early deposits and late
/// withdrawals give the lowest return; with a negative rate the roles swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingScenario {
    /// Deposits on their first possible day, withdrawals on their last.
    EarlyDeposits,
    /// Deposits on their last possible day, withdrawals on their first.
    LateDeposits,
}

impl TimingScenario {
    pub const ALL: [TimingScenario; 2] = [
        TimingScenario::EarlyDeposits,
        TimingScenario::LateDeposits,
    ];

    pub fn date_for(self, flow: &WindowedCashFlow) -> NaiveDate {
        let deposit = flow.amount > 0.0;
        let at_start = match self {
            TimingScenario::EarlyDeposits => deposit,
            TimingScenario::LateDeposits => !deposit,
        };
        if at_start {
            flow.from
        } else {
            flow.until
        }
    }
}

pub struct IrrService;

impl IrrService {
    /// `(low, high)` IRR percentages for `account` between the balances
    /// reconciled on `start` and `end`.
    pub fn account_irr(
        account: &Account,
        start: NaiveDate,
        end: NaiveDate,
        config: &SolverConfig,
    ) -> ServiceResult<(f64, f64)> {
        let extract = CashFlowService::extract(account, start, end)?;
        Self::bounded_irr(
            extract.opening,
            extract.closing,
            start,
            end,
            &extract.flows,
            config,
        )
    }

    /// Solves the rate equation under both timing scenarios and returns the
    /// results as ordered percentages.
    pub fn bounded_irr(
        opening: f64,
        closing: f64,
        start: NaiveDate,
        end: NaiveDate,
        flows: &[WindowedCashFlow],
        config: &SolverConfig,
    ) -> ServiceResult<(f64, f64)> {
        if start >= end {
            return Err(ServiceError::DegenerateWindow(format!(
                "window {} to {} has no length",
                start, end
            )));
        }
        // With no net change and flows summing to zero, r = 0 is a root
        // whatever the flow dates.
        let net_flow: f64 = flows.iter().map(|flow| flow.amount).sum();
        if opening == closing && net_flow.abs() < config.npv_tolerance {
            return Ok((0.0, 0.0));
        }

        if flows.iter().all(WindowedCashFlow::is_exact) {
            let rate = Self::solve(
                opening,
                closing,
                start,
                end,
                flows,
                TimingScenario::EarlyDeposits,
                config,
            )?;
            return Ok((rate, rate));
        }

        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;
        for scenario in TimingScenario::ALL {
            let rate = Self::solve(opening, closing, start, end, flows, scenario, config)?;
            low = low.min(rate);
            high = high.max(rate);
        }
        Ok((low, high))
    }

    /// Investor-side cash flows: the opening value goes in at `start`, account
    /// inflows go in, account outflows come out, and the closing value comes
    /// out at `end`.
    pub fn scenario_cash_flows(
        opening: f64,
        closing: f64,
        start: NaiveDate,
        end: NaiveDate,
        flows: &[WindowedCashFlow],
        scenario: TimingScenario,
    ) -> Vec<CashFlow> {
        let mut cash_flows = Vec::with_capacity(flows.len() + 2);
        cash_flows.push(CashFlow::new(start, -opening));
        cash_flows.extend(
            flows
                .iter()
                .map(|flow| CashFlow::new(scenario.date_for(flow), -flow.amount)),
        );
        cash_flows.push(CashFlow::new(end, closing));
        cash_flows
    }

    fn solve(
        opening: f64,
        closing: f64,
        start: NaiveDate,
        end: NaiveDate,
        flows: &[WindowedCashFlow],
        scenario: TimingScenario,
        config: &SolverConfig,
    ) -> ServiceResult<f64> {
        let cash_flows = Self::scenario_cash_flows(opening, closing, start, end, flows, scenario);
        let rate = xirr(&cash_flows, start, config)? * 100.0;
        debug!(?scenario, rate, "solved timing scenario");
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn scenarios_pick_opposite_edges_by_direction() {
        let deposit = WindowedCashFlow::new(10.0, date(2020, 1, 1), date(2020, 2, 1));
        let withdrawal = WindowedCashFlow::new(-10.0, date(2020, 1, 1), date(2020, 2, 1));

        assert_eq!(TimingScenario::EarlyDeposits.date_for(&deposit), date(2020, 1, 1));
        assert_eq!(TimingScenario::EarlyDeposits.date_for(&withdrawal), date(2020, 2, 1));
        assert_eq!(TimingScenario::LateDeposits.date_for(&deposit), date(2020, 2, 1));
        assert_eq!(TimingScenario::LateDeposits.date_for(&withdrawal), date(2020, 1, 1));
    }

    #[test]
    fn cash_flows_follow_investor_signs() {
        let flows = [WindowedCashFlow::new(50.0, date(2020, 3, 1), date(2020, 3, 1))];
        let cash_flows = IrrService::scenario_cash_flows(
            100.0,
            160.0,
            date(2019, 12, 31),
            date(2020, 12, 31),
            &flows,
            TimingScenario::EarlyDeposits,
        );
        let amounts: Vec<f64> = cash_flows.iter().map(|cf| cf.amount).collect();
        assert_eq!(amounts, vec![-100.0, -50.0, 160.0]);
        assert_eq!(cash_flows[2].date, date(2020, 12, 31));
    }

    #[test]
    fn flat_window_without_flows_is_zero() {
        let bounds = IrrService::bounded_irr(
            0.0,
            0.0,
            date(2019, 12, 31),
            date(2020, 12, 31),
            &[],
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(bounds, (0.0, 0.0));
    }

    #[test]
    fn cancelling_round_trip_is_zero() {
        let flows = [
            WindowedCashFlow::new(100.0, date(2001, 6, 1), date(2001, 6, 1)),
            WindowedCashFlow::new(-100.0, date(2001, 6, 1), date(2001, 6, 1)),
        ];
        let bounds = IrrService::bounded_irr(
            0.0,
            0.0,
            date(2000, 12, 31),
            date(2001, 12, 31),
            &flows,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(bounds, (0.0, 0.0));

        // Same holds when the round trip is spread out over the year.
        let flows = [
            WindowedCashFlow::new(100.0, date(2001, 2, 1), date(2001, 3, 1)),
            WindowedCashFlow::new(-100.0, date(2001, 9, 1), date(2001, 10, 1)),
        ];
        let bounds = IrrService::bounded_irr(
            500.0,
            500.0,
            date(2000, 12, 31),
            date(2001, 12, 31),
            &flows,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(bounds, (0.0, 0.0));
    }

    #[test]
    fn empty_window_is_degenerate() {
        let err = IrrService::bounded_irr(
            1.0,
            2.0,
            date(2020, 12, 31),
            date(2020, 12, 31),
            &[],
            &SolverConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::DegenerateWindow(_)));
    }
}
