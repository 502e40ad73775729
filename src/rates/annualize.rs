//! Periodic to annual compounding (TCEA / TEA)

/// Periods per year assumed when the caller passes a non-positive value
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 12.0;

/// Compound a periodic rate over a year: `(1 + i)^m - 1`.
///
/// Applied to the charge-inclusive IRR this is the TCEA; applied to the
/// base IRR it is the effective annual rate actually paid.
pub fn annualize(periodic_rate: f64, periods_per_year: f64) -> f64 {
    let periods = if periods_per_year > 0.0 {
        periods_per_year
    } else {
        DEFAULT_PERIODS_PER_YEAR
    };
    (1.0 + periodic_rate).powf(periods) - 1.0
}

/// Annual effective cost rate from the charge-inclusive periodic IRR
pub fn tcea(periodic_irr: f64, periods_per_year: f64) -> f64 {
    annualize(periodic_irr, periods_per_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_monthly_compounding() {
        assert_abs_diff_eq!(tcea(0.01, 12.0), 0.12682503013196977, epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_periods_default_to_monthly() {
        assert_eq!(tcea(0.01, 0.0), tcea(0.01, 12.0));
        assert_eq!(tcea(0.01, -4.0), tcea(0.01, 12.0));
    }

    #[test]
    fn test_zero_rate() {
        assert_eq!(annualize(0.0, 12.0), 0.0);
    }
}
