//! Annual to periodic rate conversion

use crate::error::{MortgageError, MortgageResult};
use crate::loan::RateKind;

/// Read an annual rate quoted either as a decimal or as a percentage.
///
/// Any value above 1 is taken to be a percentage and divided by 100, so a
/// genuine decimal rate above 100% cannot be expressed.
pub fn normalize_annual_rate(annual_rate: f64) -> f64 {
    if annual_rate > 1.0 {
        annual_rate / 100.0
    } else {
        annual_rate
    }
}

/// Convert an annual rate to the effective rate of one installment period.
///
/// - Nominal: `r / m`
/// - Effective: `(1 + r)^(1/m) - 1`
pub fn periodic_rate(annual_rate: f64, rate_kind: RateKind, periods_per_year: f64) -> MortgageResult<f64> {
    if annual_rate < 0.0 || annual_rate.is_nan() || !(periods_per_year > 0.0) {
        return Err(MortgageError::InvalidRate {
            annual_rate,
            periods_per_year,
        });
    }

    let rate = normalize_annual_rate(annual_rate);

    Ok(match rate_kind {
        RateKind::Nominal => rate / periods_per_year,
        RateKind::Effective => (1.0 + rate).powf(1.0 / periods_per_year) - 1.0,
    })
}
