use chrono::NaiveDate;
use tracing::{trace, warn};

use crate::config::SolverConfig;

use super::services::{ServiceError, ServiceResult};

/// Newton steps leaving this open interval are treated as divergence.
const MIN_RATE: f64 = -0.9999;
const MAX_RATE: f64 = 1000.0;
const MIN_DERIVATIVE: f64 = 1e-12;

/// Rates scanned for a sign change when Newton-Raphson gives up.
const BRACKET_GRID: [f64; 16] = [
    -0.9999, -0.99, -0.9, -0.75, -0.5, -0.25, 0.0, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 100.0,
    1000.0,
];
/// Doublings of the upper bracket past the end of the grid.
const MAX_EXPANSIONS: u32 = 64;

/// A dated cash flow from the investor's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    pub date: NaiveDate,
    /// Negative = money put in, positive = money taken out (or held at the end).
    pub amount: f64,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// Work done so far, carried into the error when no rate is found.
#[derive(Debug, Clone, Copy)]
struct Progress {
    iterations: u32,
    residual: f64,
}

impl Progress {
    fn failure(self) -> ServiceError {
        ServiceError::IrrDidNotConverge {
            iterations: self.iterations,
            residual: self.residual,
        }
    }
}

/// Annualized rate `r` (as a fraction) solving
/// `sum(amount / (1 + r)^(days / basis)) = 0`, with days counted from `base_date`.
///
/// Newton-Raphson first; on divergence or a flat derivative the rate is
/// bracketed over a fixed grid, widened upwards by doubling, and refined by
/// bisection.
pub fn xirr(
    cash_flows: &[CashFlow],
    base_date: NaiveDate,
    config: &SolverConfig,
) -> ServiceResult<f64> {
    let has_negative = cash_flows.iter().any(|cf| cf.amount < 0.0);
    let has_positive = cash_flows.iter().any(|cf| cf.amount > 0.0);
    if !has_negative || !has_positive {
        return Err(ServiceError::DegenerateWindow(
            "cash flows never change sign".into(),
        ));
    }

    let mut rate = config.initial_guess;
    let mut progress = Progress {
        iterations: 0,
        residual: npv(cash_flows, base_date, rate, config.day_count_basis),
    };
    for iteration in 0..config.max_iterations {
        let (npv, npv_derivative) =
            npv_and_derivative(cash_flows, base_date, rate, config.day_count_basis);
        trace!(iteration, rate, npv, "newton step");
        progress = Progress {
            iterations: iteration + 1,
            residual: npv,
        };

        if !npv.is_finite() || !npv_derivative.is_finite() {
            break;
        }
        if npv.abs() < config.npv_tolerance {
            if npv_derivative.abs() < MIN_DERIVATIVE {
                return Err(ServiceError::DegenerateWindow(
                    "cash flows cancel out at every rate".into(),
                ));
            }
            return Ok(rate);
        }
        if npv_derivative.abs() < MIN_DERIVATIVE {
            break;
        }

        let next = rate - npv / npv_derivative;
        if !(next > MIN_RATE && next < MAX_RATE) {
            break;
        }
        if (next - rate).abs() < config.rate_tolerance {
            return Ok(next);
        }
        rate = next;
    }

    warn!(rate, "newton-raphson did not settle, falling back to bisection");
    bisect(cash_flows, base_date, config, progress)
}

/// Net present value at `rate`.
pub fn npv(cash_flows: &[CashFlow], base_date: NaiveDate, rate: f64, basis: f64) -> f64 {
    npv_and_derivative(cash_flows, base_date, rate, basis).0
}

fn npv_and_derivative(
    cash_flows: &[CashFlow],
    base_date: NaiveDate,
    rate: f64,
    basis: f64,
) -> (f64, f64) {
    let mut npv = 0.0;
    let mut npv_derivative = 0.0;

    for cf in cash_flows {
        let years = (cf.date - base_date).num_days() as f64 / basis;
        let discount_factor = (1.0 + rate).powf(-years);
        npv += cf.amount * discount_factor;
        // d/dr [amount * (1+r)^(-t)] = -t * amount * (1+r)^(-t-1)
        npv_derivative -= years * cf.amount * discount_factor / (1.0 + rate);
    }

    (npv, npv_derivative)
}

fn bisect(
    cash_flows: &[CashFlow],
    base_date: NaiveDate,
    config: &SolverConfig,
    progress: Progress,
) -> ServiceResult<f64> {
    let basis = config.day_count_basis;
    let values: Vec<f64> = BRACKET_GRID
        .iter()
        .map(|&rate| npv(cash_flows, base_date, rate, basis))
        .collect();

    for (idx, edges) in BRACKET_GRID.windows(2).enumerate() {
        let (f_lo, f_hi) = (values[idx], values[idx + 1]);
        if !f_lo.is_finite() || !f_hi.is_finite() {
            continue;
        }
        if f_lo == 0.0 {
            return Ok(edges[0]);
        }
        if f_lo.signum() != f_hi.signum() {
            return refine(cash_flows, base_date, config, (edges[0], edges[1]), f_lo, progress);
        }
    }

    // Very short windows with large gains need rates far past the grid.
    let mut lo = MAX_RATE;
    let mut f_lo = values[values.len() - 1];
    for _ in 0..MAX_EXPANSIONS {
        if !f_lo.is_finite() {
            break;
        }
        if f_lo == 0.0 {
            return Ok(lo);
        }
        let hi = lo * 2.0;
        let f_hi = npv(cash_flows, base_date, hi, basis);
        if f_hi.is_finite() && f_lo.signum() != f_hi.signum() {
            trace!(lo, hi, "bracket widened past grid");
            return refine(cash_flows, base_date, config, (lo, hi), f_lo, progress);
        }
        lo = hi;
        f_lo = f_hi;
    }

    Err(progress.failure())
}

fn refine(
    cash_flows: &[CashFlow],
    base_date: NaiveDate,
    config: &SolverConfig,
    (mut lo, mut hi): (f64, f64),
    mut f_lo: f64,
    mut progress: Progress,
) -> ServiceResult<f64> {
    for _ in 0..config.bisection_iterations {
        let mid = (lo + hi) / 2.0;
        let f_mid = npv(cash_flows, base_date, mid, config.day_count_basis);
        progress.iterations += 1;
        progress.residual = f_mid;
        // Relative width keeps the stopping rule reachable for very large rates.
        let width_limit = config.rate_tolerance * mid.abs().max(1.0);
        if f_mid.abs() < config.npv_tolerance || (hi - lo) < width_limit {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(progress.failure())
}
