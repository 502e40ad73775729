//! Fixed installment of the French method

use crate::error::{MortgageError, MortgageResult};

/// Constant installment that amortizes `principal` over `normal_periods`.
///
/// `A = P * i(1+i)^n / ((1+i)^n - 1)`, or `P / n` when the rate is too small
/// for `(1+i)^n` to differ from one.
pub fn fixed_installment(principal: f64, periodic_rate: f64, normal_periods: i64) -> MortgageResult<f64> {
    if normal_periods <= 0 {
        return Err(MortgageError::InvalidTerm(format!(
            "{normal_periods} periods left after grace, need at least one"
        )));
    }

    let n = normal_periods as f64;
    // (1+i)^n - 1 without cancellation for tiny i
    let growth = (n * periodic_rate.ln_1p()).exp_m1();
    if growth == 0.0 {
        return Ok(principal / n);
    }

    Ok(principal * periodic_rate * (growth + 1.0) / growth)
}
