//! XIRR root-finder: the annualized rate that zeroes the net present value
//! of an irregular series of dated cash flows.
//!
//! `NPV(r) = Σ amount_i × (1 + r)^(-t_i)`, where `t_i` is the time in years
//! (actual days / 365) from the earliest cash flow to flow `i`.
//!
//! The rate is found in two stages:
//! 1. Walk a fixed ladder of candidate rates from just above -100% upwards
//!    and stop at the first pair of neighbours where NPV changes sign. If the
//!    root lies below the lowest rung, the loss is reported as that rung.
//! 2. Refine inside that bracket with Newton steps, falling back to
//!    bisection whenever a Newton step would leave the bracket.
//!
//! Both stages are bounded, so the solver always terminates.

use chrono::NaiveDateTime;

use crate::errors::XirrError;
use crate::models::cash_flow::CashFlow;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Absolute NPV below which a rate is accepted as a root.
pub const NPV_TOLERANCE: f64 = 1e-6;

/// Relative step size below which the refinement is considered converged.
pub const RATE_TOLERANCE: f64 = 1e-10;

pub const MAX_ITERATIONS: usize = 100;

/// Lowest rung of the regular ladder (a loss of 99.9999%).
pub const MIN_RATE: f64 = -0.999_999;

/// Lowest rate the solver reports. Steep losses over a few days have a true
/// rate closer to -100% than `f64` can tell apart from -1; they clamp here.
pub const FLOOR_RATE: f64 = -1.0 + 1e-15;

/// Upper end of the bracketing ladder.
pub const MAX_RATE: f64 = 1e12;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

const RATE_LADDER: [f64; 23] = [
    FLOOR_RATE, -1.0 + 1e-12, -1.0 + 1e-9, MIN_RATE, -0.999, -0.99, -0.9, -0.75, -0.5,
    -0.25, 0.0, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 100.0, 1e3, 1e6, 1e9, MAX_RATE,
];

/// Solve for the XIRR of `cash_flows`, as a fraction (0.15 = 15% a year).
///
/// Input order does not matter. Errors are returned for inputs that have
/// no meaningful rate; the function never panics.
pub fn solve(cash_flows: &[CashFlow]) -> Result<f64, XirrError> {
    if cash_flows.len() < 2 {
        return Err(XirrError::TooFewCashFlows(cash_flows.len()));
    }
    if cash_flows.iter().any(|cf| !cf.amount.is_finite()) {
        return Err(XirrError::NonFiniteAmount);
    }
    let has_outflow = cash_flows.iter().any(CashFlow::is_outflow);
    let has_inflow = cash_flows.iter().any(CashFlow::is_inflow);
    if !has_outflow || !has_inflow {
        return Err(XirrError::NoSignChange);
    }

    let base = cash_flows
        .iter()
        .map(|cf| cf.date)
        .min()
        .ok_or(XirrError::TooFewCashFlows(0))?;
    let flows: Vec<(f64, f64)> = cash_flows
        .iter()
        .map(|cf| (year_fraction(base, cf.date), cf.amount))
        .collect();

    // Everything on one instant: NPV is the same for every rate.
    if flows.iter().all(|(years, _)| *years == 0.0) {
        let net: f64 = flows.iter().map(|(_, amount)| amount).sum();
        return if net.abs() <= NPV_TOLERANCE {
            Ok(0.0)
        } else {
            Err(XirrError::NoRootInRange)
        };
    }

    match bracket(&flows) {
        Some(Bracket::Root(rate)) => Ok(rate),
        Some(Bracket::Range { lo, npv_lo, hi }) => refine(&flows, lo, npv_lo, hi),
        Some(Bracket::BelowLadder(rate)) => {
            log::debug!("XIRR: root lies below {rate}, reporting the floor");
            Ok(rate)
        }
        None => {
            log::debug!("XIRR: NPV keeps one sign between {FLOOR_RATE} and {MAX_RATE}");
            Err(XirrError::NoRootInRange)
        }
    }
}

/// Net present value of `cash_flows` at `rate`, discounted to the earliest flow.
pub fn npv(cash_flows: &[CashFlow], rate: f64) -> f64 {
    let Some(base) = cash_flows.iter().map(|cf| cf.date).min() else {
        return 0.0;
    };
    cash_flows
        .iter()
        .map(|cf| cf.amount * (1.0 + rate).powf(-year_fraction(base, cf.date)))
        .sum()
}

/// Years between two instants on an actual/365 basis (fractional days count).
pub fn year_fraction(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY / DAYS_PER_YEAR
}

enum Bracket {
    /// A ladder rate that already satisfies the tolerance.
    Root(f64),
    /// NPV changes sign between `lo` and `hi`.
    Range { lo: f64, npv_lo: f64, hi: f64 },
    /// NPV changes sign between -100% and the lowest finite rung.
    BelowLadder(f64),
}

fn bracket(flows: &[(f64, f64)]) -> Option<Bracket> {
    let mut lowest: Option<(f64, f64)> = None;
    let mut prev: Option<(f64, f64)> = None;

    for &rate in &RATE_LADDER {
        let (value, _) = npv_and_derivative(flows, rate);
        if !value.is_finite() {
            // Overflow at the extremes of the ladder; skip the point.
            continue;
        }
        if value.abs() <= NPV_TOLERANCE {
            return Some(Bracket::Root(rate));
        }
        if let Some((prev_rate, prev_value)) = prev {
            if (prev_value < 0.0) != (value < 0.0) {
                return Some(Bracket::Range {
                    lo: prev_rate,
                    npv_lo: prev_value,
                    hi: rate,
                });
            }
        }
        if lowest.is_none() {
            lowest = Some((rate, value));
        }
        prev = Some((rate, value));
    }

    // As the rate approaches -100% the latest-dated flows dominate NPV, so
    // its sign tends to the sign of their net amount.
    let (rate, value) = lowest?;
    let latest = flows.iter().map(|(years, _)| *years).fold(0.0, f64::max);
    let latest_net: f64 = flows
        .iter()
        .filter(|(years, _)| *years == latest)
        .map(|(_, amount)| amount)
        .sum();
    if latest_net != 0.0 && (latest_net < 0.0) != (value < 0.0) {
        return Some(Bracket::BelowLadder(rate));
    }

    None
}

fn refine(flows: &[(f64, f64)], mut lo: f64, mut npv_lo: f64, mut hi: f64) -> Result<f64, XirrError> {
    let mut rate = 0.5 * (lo + hi);

    for _ in 0..MAX_ITERATIONS {
        let (value, derivative) = npv_and_derivative(flows, rate);
        if !value.is_finite() {
            return Err(XirrError::NoRootInRange);
        }
        if value.abs() <= NPV_TOLERANCE {
            return Ok(rate);
        }

        // Keep the root between lo and hi.
        if (value < 0.0) == (npv_lo < 0.0) {
            lo = rate;
            npv_lo = value;
        } else {
            hi = rate;
        }

        let newton = rate - value / derivative;
        let next = if derivative != 0.0 && newton.is_finite() && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        if (next - rate).abs() <= RATE_TOLERANCE * (1.0 + next.abs()) {
            return Ok(next);
        }
        rate = next;
    }

    Err(XirrError::DidNotConverge(MAX_ITERATIONS))
}

/// NPV and dNPV/dr for flows given as (years from base, amount).
fn npv_and_derivative(flows: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let growth = 1.0 + rate;
    let mut value = 0.0;
    let mut derivative = 0.0;

    for &(years, amount) in flows {
        let discount = growth.powf(-years);
        value += amount * discount;
        derivative -= years * amount * discount / growth;
    }

    (value, derivative)
}
