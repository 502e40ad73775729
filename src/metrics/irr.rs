//! Internal Rate of Return (IRR) calculation
//!
//! Newton-Raphson on the periodic rate of a borrower cash-flow vector

use serde::{Deserialize, Serialize};

use crate::error::{MortgageError, MortgageResult};

/// Rates below this are outside the solver's domain (the discount factor vanishes)
pub const IRR_LOWER_BOUND: f64 = -1.0;

/// Rates above this (1000% per period) are treated as divergence
pub const IRR_UPPER_BOUND: f64 = 10.0;

/// Absolute tolerance on the NPV at the returned rate
pub const DEFAULT_IRR_TOLERANCE: f64 = 1e-7;

/// Newton iterations before giving up
pub const DEFAULT_IRR_MAX_ITERATIONS: u32 = 1000;

/// Seed used when the loan's periodic rate is zero
pub const FALLBACK_IRR_SEED: f64 = 0.01;

/// Settings for the IRR solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub max_iterations: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub fallback_seed: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_IRR_TOLERANCE,
            max_iterations: DEFAULT_IRR_MAX_ITERATIONS,
            lower_bound: IRR_LOWER_BOUND,
            upper_bound: IRR_UPPER_BOUND,
            fallback_seed: FALLBACK_IRR_SEED,
        }
    }
}

impl SolverConfig {
    /// Seed for a loan: its own periodic rate, or the fallback when zero
    pub fn seed_for(&self, periodic_rate: f64) -> f64 {
        if periodic_rate == 0.0 {
            self.fallback_seed
        } else {
            periodic_rate
        }
    }
}

/// NPV and its derivative with respect to the rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (discount * (1.0 + rate));
        }
    }

    (npv, dnpv)
}

/// Periodic IRR of `cashflows` starting from `guess`.
///
/// Converges when `|NPV(r)| < tolerance`. Fails with `DerivativeZero` when the
/// slope vanishes, `Diverged` when an iterate leaves the configured bounds and
/// `DidNotConverge` when the iteration budget runs out.
pub fn solve_irr(cashflows: &[f64], guess: f64, config: &SolverConfig) -> MortgageResult<f64> {
    if cashflows.is_empty() {
        return Err(MortgageError::EmptyCashFlow);
    }

    let mut rate = guess;

    for iteration in 0..config.max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if npv.abs() < config.tolerance {
            return Ok(rate);
        }

        if dnpv == 0.0 {
            return Err(MortgageError::DerivativeZero { rate, iteration });
        }

        rate -= npv / dnpv;

        if rate < config.lower_bound || rate > config.upper_bound || rate.is_nan() {
            return Err(MortgageError::Diverged { rate, iteration });
        }
    }

    // The last step has not been checked yet
    let (residual, _) = npv_and_derivative(cashflows, rate);
    if residual.abs() < config.tolerance {
        return Ok(rate);
    }

    Err(MortgageError::DidNotConverge {
        iterations: config.max_iterations,
        residual,
    })
}

/// Periodic IRR with the default solver settings
pub fn calculate_irr(cashflows: &[f64], guess: f64) -> MortgageResult<f64> {
    solve_irr(cashflows, guess, &SolverConfig::default())
}
