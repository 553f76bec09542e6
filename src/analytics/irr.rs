//! Discounted cash flow metrics: IRR, NPV and payback period
//!
//! Cash flows are annual, indexed from year 0.

use serde::{Deserialize, Serialize};

/// Lower bound of the IRR search interval
pub const IRR_LOWER_BOUND: f64 = -0.99;

/// Upper bound of the IRR search interval
pub const IRR_UPPER_BOUND: f64 = 1.0;

/// Starting rate for the IRR search
pub const IRR_INITIAL_GUESS: f64 = 0.1;

/// Absolute NPV below which the IRR search stops
pub const IRR_NPV_TOLERANCE: f64 = 1000.0;

/// Maximum IRR bisection steps
pub const IRR_MAX_ITERATIONS: u32 = 100;

/// Payback is never reported earlier than this year
pub const MIN_PAYBACK_YEARS: usize = 2;

/// Outcome of the IRR search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrSolution {
    /// Rate reached when the search stopped
    pub rate: f64,
    /// NPV evaluations performed
    pub iterations: u32,
    /// NPV of the cash flows at `rate`
    pub residual_npv: f64,
    /// Whether `|residual_npv|` is within tolerance
    pub converged: bool,
}

/// Calculate the IRR of annual cash flows by bisection
///
/// Starts at 10% within [-99%, 100%]. Each step evaluates NPV at the current
/// rate and stops once it is within R$1,000 of zero; otherwise positive NPV
/// raises the lower bound, anything else lowers the upper bound, and the next
/// rate is the midpoint. The last rate is returned even if the search did not
/// converge (for example when the true IRR lies outside the interval or the
/// flows never change sign); check `converged`.
pub fn calculate_irr(cashflows: &[f64]) -> IrrSolution {
    let mut rate = IRR_INITIAL_GUESS;
    let mut low = IRR_LOWER_BOUND;
    let mut high = IRR_UPPER_BOUND;

    for i in 0..IRR_MAX_ITERATIONS {
        let npv = npv_at_rate(cashflows, rate);

        if npv.abs() < IRR_NPV_TOLERANCE {
            return IrrSolution {
                rate,
                iterations: i + 1,
                residual_npv: npv,
                converged: true,
            };
        }

        if npv > 0.0 {
            low = rate;
        } else {
            high = rate;
        }
        rate = (low + high) / 2.0;
    }

    let residual_npv = npv_at_rate(cashflows, rate);
    IrrSolution {
        rate,
        iterations: IRR_MAX_ITERATIONS,
        residual_npv,
        converged: residual_npv.abs() < IRR_NPV_TOLERANCE,
    }
}

/// Net present value of annual cash flows at `rate`
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// First year in which cumulative cash flow turns positive
///
/// Floored at year 2. Returns the number of flows (also floored) if the
/// cumulative sum never turns positive.
pub fn payback_period(cashflows: &[f64]) -> usize {
    let mut cumulative = 0.0;
    for (year, &cf) in cashflows.iter().enumerate() {
        cumulative += cf;
        if cumulative > 0.0 {
            return year.max(MIN_PAYBACK_YEARS);
        }
    }
    cashflows.len().max(MIN_PAYBACK_YEARS)
}
