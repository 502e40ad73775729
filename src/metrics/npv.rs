//! Net present value of a cash-flow vector

use crate::error::{MortgageError, MortgageResult};
use crate::loan::RateKind;
use crate::rates::periodic_rate;

/// Discount `flows` at a periodic rate: `sum(flows[k] / (1 + r)^k)`.
///
/// `flows[0]` is undiscounted.
pub fn npv_at_periodic_rate(flows: &[f64], rate: f64) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(k, &cf)| cf / (1.0 + rate).powi(k as i32))
        .sum()
}

/// NPV of `flows` at an annual discount rate.
///
/// The annual rate is treated as effective and converted to the period of
/// the flows, percentage heuristic included.
pub fn npv(flows: &[f64], annual_discount_rate: f64, periods_per_year: f64) -> MortgageResult<f64> {
    if flows.is_empty() {
        return Err(MortgageError::EmptyCashFlow);
    }

    let rate = periodic_rate(annual_discount_rate, RateKind::Effective, periods_per_year)?;
    Ok(npv_at_periodic_rate(flows, rate))
}
